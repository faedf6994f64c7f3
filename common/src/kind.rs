//! Macros for defining kind enums.

/// Macro for defining a closed kind enum.
///
/// Variants are displayed, parsed and (with the `serde` feature) serialized
/// in `lowercase`.
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
/// define_kind! {
///     #[doc = "Shape kind."]
///     enum Kind {
///         #[doc = "A cube"]
///         Cube = 1,
///
///         #[doc = "A sphere"]
///         Sphere = 2,
///     }
/// }
///
/// assert_eq!(Kind::Cube.to_string(), "cube");
/// assert_eq!("sphere".parse::<Kind>().unwrap(), Kind::Sphere);
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumIter,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
        )]
        #[cfg_attr(
            feature = "serde",
            derive(
                $crate::private::serde::Deserialize,
                $crate::private::serde::Serialize,
            ),
            serde(rename_all = "lowercase"),
        )]
        #[doc = $doc]
        #[repr(u8)]
        #[strum(serialize_all = "lowercase")]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant = $value,
            )*
        }
    };
}

#[cfg(test)]
mod spec {
    use strum::IntoEnumIterator as _;

    define_kind! {
        #[doc = "Test kind."]
        enum Level {
            #[doc = "Low."]
            Low = 1,

            #[doc = "High."]
            High = 2,
        }
    }

    #[test]
    fn displays_and_parses_lowercase() {
        assert_eq!(Level::Low.to_string(), "low");
        assert_eq!(Level::High.to_string(), "high");
        assert_eq!("high".parse::<Level>().unwrap(), Level::High);
        assert!("HIGH".parse::<Level>().is_err());
    }

    #[test]
    fn iterates_in_declaration_order() {
        let names = Level::iter().map(|l| l.to_string()).collect::<Vec<_>>();

        assert_eq!(names, ["low", "high"]);
    }
}
