mod gate_test;
mod warehouse_test;
