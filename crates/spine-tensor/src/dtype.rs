use std::fmt;

/// Element type tag carried by an [`crate::NDArray`].
///
/// The tag is informational only: storage is always `f64`. It lets collaborators that
/// hand over integer or boolean tables keep track of what the numbers originally were.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub enum DType {
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    #[default]
    Float64,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Boolean mask.
    Bool,
}

impl DType {
    /// Returns the canonical lowercase name of the tag.
    pub fn name(&self) -> &'static str {
        match self {
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Bool => "bool",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
