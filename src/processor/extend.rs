//! Extend collaborator: supplies the continuation of a dotted column path

use serde::Serialize;

use crate::model::ExpressionNode;

/// What to extend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendRequest {
    /// Column codes from the chain head to the extended column, dot-joined
    pub root_meta_path: String,
    /// Chain the continuation will join
    pub chain_key: String,
}

/// Optional source of drill-down continuations.
///
/// Returned tokens are spliced in after the column and given the request's
/// chain key. An empty list falls back to a "." and a placeholder.
pub trait ExtendSource {
    fn extend(&self, request: &ExtendRequest) -> Vec<ExpressionNode>;
}
