mod tests_const_expr;
mod tests_doc_block;
mod tests_types;
