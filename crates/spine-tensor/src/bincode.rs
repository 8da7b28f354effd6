use crate::{array::NDArray, dtype::DType};

impl bincode::enc::Encode for NDArray {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(self.shape(), encoder)?;
        bincode::Encode::encode(&self.dtype(), encoder)?;
        bincode::Encode::encode(self.as_slice(), encoder)?;
        Ok(())
    }
}

impl<C> bincode::de::Decode<C> for NDArray {
    fn decode<D: bincode::de::Decoder<Context = C>>(
        decoder: &mut D,
    ) -> Result<Self, bincode::error::DecodeError> {
        let shape: Vec<usize> = bincode::Decode::decode(decoder)?;
        let dtype: DType = bincode::Decode::decode(decoder)?;
        let data: Vec<f64> = bincode::Decode::decode(decoder)?;
        NDArray::from_shape_vec(shape, data)
            .map(|a| a.with_dtype(dtype))
            .map_err(|e| bincode::error::DecodeError::OtherString(format!("Array error: {}", e)))
    }
}
