//! SQL script handling: segmentation and whole-script transforms.

mod segmenter;

pub use segmenter::split_statements;

/// Rewrites a script so that every statement runs as an EXPLAIN.
///
/// Statements are segmented (comments stripped) and each is prefixed with
/// `EXPLAIN`, so executing the result validates query plans without
/// touching warehouse state.
pub fn prepend_explain(script: &str) -> String {
    let statements: Vec<String> = split_statements(script)
        .into_iter()
        .map(|statement| format!("EXPLAIN {statement}"))
        .collect();

    if statements.is_empty() {
        return String::new();
    }

    let mut rewritten = statements.join(";\n\n");
    rewritten.push(';');
    rewritten
}
