use crate::{array::NDArray, dtype::DType};

use serde::ser::SerializeStruct;
use serde::Deserialize;

impl serde::Serialize for NDArray {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("NDArray", 3)?;
        state.serialize_field("data", self.as_slice())?;
        state.serialize_field("shape", self.shape())?;
        state.serialize_field("dtype", &self.dtype())?;
        state.end()
    }
}

impl<'de> serde::Deserialize<'de> for NDArray {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ArrayData {
            data: Vec<f64>,
            shape: Vec<usize>,
            #[serde(default)]
            dtype: DType,
        }

        let ArrayData { data, shape, dtype } = ArrayData::deserialize(deserializer)?;

        // strides are derived, only the element count needs validating
        NDArray::from_shape_vec(shape, data)
            .map(|a| a.with_dtype(dtype))
            .map_err(serde::de::Error::custom)
    }
}
