pub mod xgmml;

pub use crate::io::xgmml::{fix_header, write_xgmml, HeaderRewriter, XGMMLWriter, XGMMLWriterError};
