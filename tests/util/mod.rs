use std::fmt;

/// Equality wrapper that prints its contents as raw bits, so mismatching decimal encodings
/// show up as hex in assertion failures.
#[derive(PartialEq)]
pub struct Bits<T: fmt::LowerHex>(pub T);

impl<T: fmt::LowerHex> fmt::Debug for Bits<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{:#018x}]", self.0)
    }
}
