use crate::model::{MethodDescriptor, ModelSet};
use crate::registry::{Application, Parameter};

pub const CREATE: &str = "create";
pub const CREATE_MANY: &str = "createMany";

/// Augment the method list of every collected model.
pub fn augment_models(app: &Application, set: &mut ModelSet) {
    for model in &mut set.models {
        let ctor_accepts = app
            .class(&model.declared_name)
            .and_then(|c| c.ctor.as_ref())
            .and_then(|ctor| ctor.accepts.as_deref());
        augment_methods(&mut model.methods, ctor_accepts);
    }
}

/// In place:
/// - instance methods get the constructor's parameters in front of their own,
///   unless the model has no constructor parameter list;
/// - non-`id` path parameters are collected as resource parameters;
/// - a single `create` gains an array-returning `createMany` twin.
///
/// Descriptions were already normalized when the descriptors were built.
pub fn augment_methods(methods: &mut Vec<MethodDescriptor>, ctor_accepts: Option<&[Parameter]>) {
    for method in methods.iter_mut() {
        if let Some(ctor_accepts) = ctor_accepts {
            if !method.is_static {
                let mut accepts = ctor_accepts.to_vec();
                accepts.append(&mut method.accepts);
                method.accepts = accepts;
            }
        }
        method.collect_resource_params();
    }

    add_create_many(methods);
}

/// Returns false when there is no `create`, or more than one.
pub fn add_create_many(methods: &mut Vec<MethodDescriptor>) -> bool {
    let mut creates = methods.iter().filter(|m| m.name == CREATE);
    let create_many = match (creates.next(), creates.next()) {
        (Some(create), None) => create.returning_array(CREATE_MANY),
        _ => return false,
    };
    methods.push(create_many);
    true
}
