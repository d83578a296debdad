/// Déclare une signature d'opération statique.
///
/// Chaque argument est déclaré avec sa direction (`in` ou `out`), son nom
/// et le descripteur de type associé (`Arc<TypeDescriptor>`, éventuellement
/// derrière un `Lazy`).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use once_cell::sync::Lazy;
/// use pmoupnp::define_operation;
/// use pmoxsd::{PrimitiveType, TypeDescriptor};
///
/// static UI4: Lazy<Arc<TypeDescriptor>> =
///     Lazy::new(|| TypeDescriptor::primitive(PrimitiveType::UI4));
///
/// define_operation! {
///     pub static STOP = "Stop" {
///         in "InstanceID" => UI4,
///     }
/// }
///
/// define_operation! {
///     pub static GET_CONNECTION_IDS = "GetCurrentConnectionIDs"
/// }
///
/// assert_eq!(STOP.name(), "Stop");
/// assert_eq!(STOP.inputs().len(), 1);
/// assert!(GET_CONNECTION_IDS.inputs().is_empty());
/// ```
#[macro_export]
macro_rules! define_operation {
    // Variante sans arguments
    (pub static $name:ident = $op_name:literal) => {
        pub static $name: $crate::once_cell::sync::Lazy<$crate::pmoxsd::OperationSignature> =
            $crate::once_cell::sync::Lazy::new(|| $crate::pmoxsd::OperationSignature::new($op_name));
    };

    // Variante avec arguments
    (pub static $name:ident = $op_name:literal {
        $(
            $direction:ident $arg_name:literal => $desc:expr
        ),* $(,)?
    }) => {
        pub static $name: $crate::once_cell::sync::Lazy<$crate::pmoxsd::OperationSignature> =
            $crate::once_cell::sync::Lazy::new(|| {
                let op = $crate::pmoxsd::OperationSignature::new($op_name);
                $(
                    let op = $crate::define_operation!(@arg op, $direction $arg_name, $desc);
                )*
                op
            });
    };

    (@arg $op:ident, in $arg_name:literal, $desc:expr) => {
        $op.with_input($arg_name, ::std::sync::Arc::clone(&$desc))
    };

    (@arg $op:ident, out $arg_name:literal, $desc:expr) => {
        $op.with_output($arg_name, ::std::sync::Arc::clone(&$desc))
    };
}

/// Construit un [`ActionHandler`](crate::services::ActionHandler) à partir
/// d'une closure prenant les arguments décodés.
///
/// La closure est `move` : elle capture le contrôleur qu'elle pilote.
///
/// # Examples
///
/// ```
/// use pmoupnp::action_handler;
/// use pmoupnp::services::{ActionHandler, ActionOutput};
///
/// let handler: ActionHandler = action_handler!(|_args| {
///     Ok(ActionOutput::new().with("ConnectionIDs", "0"))
/// });
/// ```
#[macro_export]
macro_rules! action_handler {
    (|$args:ident| $body:expr) => {
        ::std::sync::Arc::new(
            move |$args: &$crate::services::ActionArgs| -> ::std::result::Result<
                $crate::services::ActionOutput,
                $crate::services::ActionError,
            > { $body },
        ) as $crate::services::ActionHandler
    };
}
