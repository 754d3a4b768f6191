//! Response side of an endpoint.

use crate::schema_generator::{ExampleValue, SchemaGenerator};
use crate::type_ref::TypeRef;
use log::debug;

/// Build the response example from a method's declared return type.
///
/// Only generic and array return types describe a payload: `ActionResult<Customer>`,
/// `Task<List<Order>>`, `Order[]`. A plain return type such as `IActionResult` or
/// `void` gives `{}`.
pub fn response_example(generator: &SchemaGenerator<'_>, return_type: &str) -> ExampleValue {
    let type_ref = match TypeRef::parse(return_type) {
        Ok(type_ref) => type_ref,
        Err(e) => {
            debug!("{}", e);
            return ExampleValue::empty_object();
        }
    };

    if !type_ref.is_generic() && !type_ref.is_array() {
        return ExampleValue::empty_object();
    }
    generator.synthesize(&type_ref)
}
