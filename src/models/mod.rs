pub mod invoice;
pub mod record;
