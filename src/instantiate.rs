use crate::error::Error;
use crate::object::ObjectNode;
use crate::resolver::Resolver;
use crate::types::Value;
use std::fmt;
use std::rc::Rc;

/// A factory routine: the receiver under construction is threaded in
/// explicitly rather than through ambient state, so a factory body can call
/// another factory's body on the same node to layer initialisation.
#[derive(Clone)]
pub struct Factory {
    name: Rc<str>,
    body: Rc<dyn Fn(&Resolver, &ObjectNode, &[Value]) -> Result<Value, Error>>,
}

impl Factory {
    pub fn new(
        name: &str,
        body: impl Fn(&Resolver, &ObjectNode, &[Value]) -> Result<Value, Error> + 'static,
    ) -> Self {
        Self {
            name: Rc::from(name),
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the factory body against an existing receiver. Used by factories
    /// that delegate part of their initialisation to another factory.
    pub fn call(
        &self,
        resolver: &Resolver,
        receiver: &ObjectNode,
        args: &[Value],
    ) -> Result<Value, Error> {
        (self.body)(resolver, receiver, args)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Factory({:?})", self.name)
    }
}

/// The allocate-link-invoke sequence: a fresh node is linked to `template`
/// and handed to `factory` as its receiver. If the body produces an
/// object-shaped result, that object replaces the fresh node as the return
/// value. Errors from the link step or the body propagate unchanged and no
/// partially initialised node escapes.
pub fn instantiate(
    resolver: &Resolver,
    factory: &Factory,
    template: Option<&ObjectNode>,
    args: &[Value],
) -> Result<ObjectNode, Error> {
    let node = ObjectNode::new();
    // a fresh node cannot close a loop, but the guard stays on this path
    node.set_delegate(template)?;
    match factory.call(resolver, &node, args)? {
        Value::Object(replacement) => Ok(replacement),
        _ => Ok(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::WritePolicy;
    use crate::types::PropertyKey;

    fn employee_factory() -> Factory {
        Factory::new("Employee", |resolver, this, _args| {
            resolver.write(this, &"name".into(), "".into())?;
            resolver.write(this, &"dept".into(), "general".into())?;
            Ok(Value::Undefined)
        })
    }

    fn get(resolver: &Resolver, node: &ObjectNode, key: &str) -> Value {
        resolver.get(node, &key.into()).unwrap()
    }

    #[test]
    fn manager_instance_inherits_template_defaults() {
        let resolver = Resolver::default();
        let employee = ObjectNode::new();
        resolver.write(&employee, &"name".into(), "".into()).unwrap();
        resolver
            .write(&employee, &"dept".into(), "general".into())
            .unwrap();

        let manager_factory = Factory::new("Manager", |resolver, this, _args| {
            resolver.write(this, &"reports".into(), Value::list(vec![]))?;
            Ok(Value::Undefined)
        });
        let sally = instantiate(&resolver, &manager_factory, Some(&employee), &[]).unwrap();

        assert_eq!(get(&resolver, &sally, "name"), "".into());
        assert_eq!(get(&resolver, &sally, "dept"), "general".into());
        assert!(resolver.has_own(&sally, &"reports".into()));
        assert!(!resolver.has_own(&sally, &"name".into()));
    }

    #[test]
    fn bare_instantiation_links_no_delegate() {
        let resolver = Resolver::default();
        let jim = instantiate(&resolver, &employee_factory(), None, &[]).unwrap();
        assert!(jim.delegate().is_none());
        assert_eq!(get(&resolver, &jim, "name"), "".into());
        assert_eq!(get(&resolver, &jim, "dept"), "general".into());
    }

    #[test]
    fn factories_may_layer_through_explicit_receivers() {
        // Employee -> WorkerBee -> Engineer, each layer initialising the
        // same receiver before adding its own properties.
        let resolver = Resolver::default();
        let employee = instantiate(&resolver, &employee_factory(), None, &[]).unwrap();

        let base = employee_factory();
        let worker_factory = Factory::new("WorkerBee", move |resolver, this, _args| {
            base.call(resolver, this, &[])?;
            resolver.write(this, &"projects".into(), Value::list(vec![]))?;
            Ok(Value::Undefined)
        });
        let worker = instantiate(&resolver, &worker_factory, Some(&employee), &[]).unwrap();

        let engineer_factory = Factory::new("Engineer", |resolver, this, _args| {
            resolver.write(this, &"dept".into(), "engineering".into())?;
            resolver.write(this, &"machine".into(), "".into())?;
            Ok(Value::Undefined)
        });
        let jane = instantiate(&resolver, &engineer_factory, Some(&worker), &[]).unwrap();

        assert_eq!(get(&resolver, &jane, "name"), "".into());
        assert_eq!(get(&resolver, &jane, "dept"), "engineering".into());
        assert_eq!(get(&resolver, &worker, "dept"), "general".into());
        assert!(resolver.has(&jane, &"projects".into()));
        assert!(!resolver.has_own(&jane, &"projects".into()));
        assert!(resolver.has_own(&jane, &"machine".into()));
    }

    #[test]
    fn factory_args_reach_the_body() {
        let resolver = Resolver::default();
        let factory = Factory::new("Employee", |resolver, this, args| {
            let name = args.first().cloned().unwrap_or(Value::Undefined);
            resolver.write(this, &"name".into(), name)?;
            Ok(Value::Undefined)
        });
        let victoria =
            instantiate(&resolver, &factory, None, &["victoria".into()]).unwrap();
        assert_eq!(get(&resolver, &victoria, "name"), "victoria".into());
    }

    #[test]
    fn object_shaped_result_replaces_the_fresh_node() {
        let resolver = Resolver::default();
        let stand_in = ObjectNode::new();
        resolver
            .write(&stand_in, &"kind".into(), "replacement".into())
            .unwrap();
        let stand_in_for_body = stand_in.clone();
        let factory = Factory::new("Swapper", move |resolver, this, _args| {
            resolver.write(this, &"kind".into(), "discarded".into())?;
            Ok(Value::Object(stand_in_for_body.clone()))
        });

        let template = ObjectNode::new();
        let result = instantiate(&resolver, &factory, Some(&template), &[]).unwrap();
        assert!(result.ptr_eq(&stand_in));
        assert_eq!(get(&resolver, &result, "kind"), "replacement".into());
        // the replacement keeps its own links, not the protocol's
        assert!(result.delegate().is_none());
    }

    #[test]
    fn non_object_results_are_ignored() {
        let resolver = Resolver::default();
        let factory = Factory::new("Primitive", |_resolver, _this, _args| {
            Ok(Value::from(42.0))
        });
        let template = ObjectNode::new();
        let node = instantiate(&resolver, &factory, Some(&template), &[]).unwrap();
        assert!(node.delegate().is_some_and(|d| d.ptr_eq(&template)));
    }

    #[test]
    fn factory_errors_propagate_unchanged() {
        let resolver = Resolver::default();
        let factory = Factory::new("Failing", |_resolver, _this, _args| {
            Err(Error::Host("constructor refused".into()))
        });
        assert_eq!(
            instantiate(&resolver, &factory, None, &[]).unwrap_err(),
            Error::Host("constructor refused".into())
        );
    }

    #[test]
    fn strict_factory_writes_surface_configuration_errors() {
        let strict = Resolver::new(WritePolicy::Strict);
        let template = ObjectNode::new();
        template
            .define_own(
                "brand".into(),
                crate::PropertyRecord::data("fixed".into(), false, true, true),
            )
            .unwrap();
        let factory = Factory::new("Brander", |resolver, this, _args| {
            resolver.write(this, &"brand".into(), "mine".into())?;
            Ok(Value::Undefined)
        });
        let err = instantiate(&strict, &factory, Some(&template), &[]).unwrap_err();
        assert_eq!(
            err,
            Error::Configuration {
                key: PropertyKey::from("brand")
            }
        );
    }
}
