use crate::binding::{FormState, GenericField};
use crate::node::Node;

/// A concrete input bound to one path through a [`GenericField`].
///
/// Implementations only supply the input itself; label, description and
/// the error slot always come from the binder.
pub trait FieldAdapter: Send + Sync {
    fn field(&self) -> &GenericField;

    fn render(&self, state: &FormState) -> Node;

    fn name(&self) -> &str {
        &self.field().name
    }
}
