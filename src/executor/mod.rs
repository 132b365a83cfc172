mod dispatch;

pub use dispatch::GeneratedKey;
