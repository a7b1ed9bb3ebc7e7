/// Get the number of kibibytes in bytes
#[allow(non_snake_case)]
pub const fn KiB(val: usize) -> usize {
    val * 1024
}
