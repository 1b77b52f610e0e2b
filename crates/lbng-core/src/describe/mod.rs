//! Turns an [`Application`] registry into the [`ModelSet`] the renderer consumes.
//!
//! Passes run strictly in order: collect every model, augment method lists,
//! resolve relation scopes across the full set, then snapshot schemas.

pub mod augment;
pub mod collector;
pub mod schema;
pub mod scope;

use crate::config::GeneratorOptions;
use crate::model::ModelSet;
use crate::registry::Application;

pub fn describe_models(app: &Application, options: &GeneratorOptions) -> ModelSet {
    let mut set = collector::collect(app, options);
    augment::augment_models(app, &mut set);
    scope::resolve_scopes(app, options, &mut set);
    if options.include_schema {
        schema::build_schemas(app, &mut set);
    }
    set
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::registry::Application;
    use serde_json::json;

    /// A small shop: gadgets have many widgets, widgets belong to a gadget,
    /// customers derive from User.
    pub fn shop() -> Application {
        serde_json::from_value(json!({
            "remotingVersion": 3,
            "models": [
                {
                    "name": "gadget",
                    "http": { "path": "/gadgets" },
                    "settings": { "description": ["Gadgets for sale.", "Each has widgets."] },
                    "ctor": { "accepts": [
                        { "arg": "id", "type": "any", "required": true, "http": { "source": "path" } }
                    ] },
                    "prototypeChain": ["PersistedModel", "Model"],
                    "relations": {
                        "widgets": { "targetClass": "widget", "type": "hasMany" },
                        "accessories": { "targetClass": "accessory", "type": "hasMany" },
                        "broken": { "type": "hasMany" }
                    },
                    "methods": [
                        { "name": "create", "isStatic": true,
                          "accepts": [{ "arg": "data", "type": "object", "http": { "source": "body" } }],
                          "returns": [{ "arg": "data", "type": "gadget", "root": true }],
                          "endpoints": [{ "verb": "POST", "fullPath": "/gadgets" }] },
                        { "name": "find", "isStatic": true,
                          "accepts": [{ "arg": "filter", "type": "object", "http": { "source": "query" } }],
                          "returns": [{ "arg": "data", "type": ["gadget"], "root": true }],
                          "endpoints": [{ "verb": "GET", "fullPath": "/gadgets" }] },
                        { "name": "prototype.__get__widgets", "isStatic": false,
                          "accepts": [{ "arg": "filter", "type": "object", "http": { "source": "query" } }],
                          "returns": [{ "arg": "widgets", "type": ["widget"], "root": true }],
                          "endpoints": [{ "verb": "GET", "fullPath": "/gadgets/:id/widgets" }] },
                        { "name": "prototype.__create__widgets", "isStatic": false,
                          "accepts": [{ "arg": "data", "type": "object", "http": { "source": "body" } }],
                          "returns": [{ "arg": "data", "type": "widget", "root": true }],
                          "endpoints": [{ "verb": "POST", "fullPath": "/gadgets/:id/widgets" }] },
                        { "name": "prototype.__delete__widgets", "isStatic": false,
                          "accepts": [],
                          "endpoints": [{ "verb": "DELETE", "fullPath": "/gadgets/:id/widgets" }] },
                        { "name": "prototype.__findById__widgets", "isStatic": false,
                          "accepts": [{ "arg": "fk", "type": "any", "required": true, "http": { "source": "path" } }],
                          "returns": [{ "arg": "data", "type": "widget", "root": true }],
                          "endpoints": [{ "verb": "GET", "fullPath": "/gadgets/:id/widgets/:fk" }] },
                        { "name": "prototype.__get__accessories", "isStatic": false,
                          "accepts": [],
                          "returns": [{ "arg": "accessories", "type": ["accessory"], "root": true }],
                          "endpoints": [{ "verb": "GET", "fullPath": "/gadgets/:id/accessories" }] },
                        { "name": "prototype.__count__accessories", "isStatic": false,
                          "accepts": [],
                          "endpoints": [{ "verb": "GET", "fullPath": "/gadgets/:id/accessories/count" }] },
                        { "name": "prototype.__get__broken", "isStatic": false,
                          "accepts": [],
                          "endpoints": [{ "verb": "GET", "fullPath": "/gadgets/:id/broken" }] }
                    ],
                    "properties": {
                        "name": { "type": "string", "required": true },
                        "maker": { "type": { "$class": { "modelName": "Maker", "name": "ModelConstructor" } } },
                        "tags": { "type": ["string"] }
                    }
                },
                {
                    "name": "widget",
                    "http": { "path": "/widgets" },
                    "settings": { "description": "A widget." },
                    "ctor": { "accepts": [
                        { "arg": "id", "type": "any", "required": true, "http": { "source": "path" } }
                    ] },
                    "relations": {
                        "gadget": { "targetClass": "gadget", "type": "belongsTo" }
                    },
                    "methods": [
                        { "name": "create", "isStatic": true,
                          "accepts": [{ "arg": "data", "type": "object", "http": { "source": "body" } }],
                          "endpoints": [{ "verb": "POST", "fullPath": "/widgets" }] },
                        { "name": "create", "isStatic": true,
                          "accepts": [{ "arg": "data", "type": "object", "http": { "source": "body" } }],
                          "endpoints": [{ "verb": "PUT", "fullPath": "/widgets" }] },
                        { "name": "prototype.__get__gadget", "isStatic": false,
                          "accepts": [{ "arg": "refresh", "type": "boolean", "http": { "source": "query" } }],
                          "endpoints": [{ "verb": "GET", "fullPath": "/widgets/:id/gadget" }] }
                    ],
                    "properties": { "size": { "type": "number" } }
                },
                {
                    "name": "customer",
                    "http": { "path": "/customers" },
                    "ctor": {},
                    "prototypeChain": ["User", "PersistedModel"],
                    "methods": [
                        { "name": "login", "isStatic": true,
                          "accepts": [{ "arg": "credentials", "type": "object", "http": { "source": "body" } }],
                          "endpoints": [{ "verb": "POST", "fullPath": "/customers/login" }] },
                        { "name": "prototype.updateAttributes", "isStatic": false,
                          "accepts": [{ "arg": "data", "type": "object", "http": { "source": "body" } }],
                          "endpoints": [{ "verb": "PUT", "fullPath": "/customers/:id" }] }
                    ]
                },
                { "name": "helperService", "methods": [] }
            ]
        }))
        .unwrap()
    }
}
