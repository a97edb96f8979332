mod collapsing;
mod identity;
#[cfg(test)]
mod test_utils;

pub(crate) use collapsing::*;
pub(crate) use identity::*;
