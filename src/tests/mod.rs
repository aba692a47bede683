mod corpus;
mod props;
mod scenarios;
pub(crate) mod writer;
