use actix_web::middleware::{Compress, Condition};

pub type Compression = Condition<Compress>;

/// Compresión de respuestas, apagada con `ENABLE_COMPRESSION=false`.
pub fn create_compression_middleware(enabled: bool) -> Compression {
    Condition::new(enabled, Compress::default())
}
