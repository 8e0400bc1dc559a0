pub mod campaign;
pub mod oracle;
