mod tests_differ;
mod tests_format_preserving;
mod tests_round_trip;
