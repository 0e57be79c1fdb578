use std::fmt;

/// Element types a kernel run can be verified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    I32,
    F32,
}

impl DType {
    /// Size of one encoded element in bytes.
    pub const fn size_in_bytes(self) -> usize {
        match self {
            DType::I32 => 4,
            DType::F32 => 4,
        }
    }

    /// Name printed in the run banner.
    pub const fn name(self) -> &'static str {
        match self {
            DType::I32 => "integer",
            DType::F32 => "float",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_sizes() {
        assert_eq!(DType::I32.size_in_bytes(), 4);
        assert_eq!(DType::F32.size_in_bytes(), 4);
    }

    #[test]
    fn test_dtype_names() {
        assert_eq!(DType::I32.to_string(), "integer");
        assert_eq!(DType::F32.to_string(), "float");
    }
}
