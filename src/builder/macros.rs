//! Macros for ergonomic state machine construction.

/// Declare a plain enum usable as a machine state.
///
/// Adds the derives a state needs (`Clone`, `Copy`, equality, ordering,
/// hashing, `Debug` and serde), plus a `name()` method and an `ALL` list of
/// every variant in declaration order.
///
/// # Example
///
/// ```
/// use tinysm::state_enum;
///
/// state_enum! {
///     pub enum Elevator {
///         MovingUp,
///         MovingDown,
///         DoorOpen,
///         DoorClosed,
///     }
/// }
///
/// assert_eq!(Elevator::DoorOpen.name(), "DoorOpen");
/// assert_eq!(Elevator::ALL.len(), 4);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            #[allow(dead_code)]
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
