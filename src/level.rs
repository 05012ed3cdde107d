use std::str::FromStr;

use crate::error::LandsatError;
use strum::{EnumString, IntoStaticStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum ProcessingLevel {
    #[strum(serialize = "L1T")]
    L1T,
    #[strum(serialize = "L1GT")]
    L1GT,
}

impl ProcessingLevel {
    pub fn parse(code: &str) -> Result<Self, LandsatError> {
        ProcessingLevel::from_str(code).map_err(|_| LandsatError::UnexpectedLevel(code.to_owned()))
    }
}
