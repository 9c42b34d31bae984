//! Members of the intrinsic prototypes

pub mod function;
pub mod object;

pub use function::*;
pub use object::*;

use crate::binding::populate;
use crate::error::JsError;
use crate::runtime::Runtime;
use crate::value::CheapClone;

/// Populate `Object.prototype` and `Function.prototype`
pub fn init_intrinsics(rt: &mut Runtime) -> Result<(), JsError> {
    let object_prototype = rt.object_prototype().cheap_clone();
    populate(rt, &object_prototype, OBJECT_PROTOTYPE_MEMBERS)?;

    let function_prototype = rt.function_prototype().cheap_clone();
    populate(rt, &function_prototype, FUNCTION_PROTOTYPE_MEMBERS)?;
    Ok(())
}
