#[path = "parser/mod.rs"]
mod parser;

#[path = "printer/mod.rs"]
mod printer;
