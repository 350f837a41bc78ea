/// Returns whether the argument is even-valued.
pub fn is_even(value: usize) -> bool {
    value % 2 == 0
}
