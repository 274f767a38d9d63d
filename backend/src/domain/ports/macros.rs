//! `define_port_error!` builds a thiserror enum plus one snake_case
//! constructor per variant whose fields accept `impl Into<T>`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum ProbePortError {
            Timeout { message: String } => "timed out: {message}",
            Refused { attempts: u32 } => "refused after {attempts} attempts",
            Rejected { message: String, status: u16 } => "rejected ({status}): {message}",
            Closed => "closed",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(ProbePortError::timeout("pool").to_string(), "timed out: pool");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        assert_eq!(
            ProbePortError::refused(3_u32).to_string(),
            "refused after 3 attempts"
        );
    }

    #[test]
    fn mixed_fields_are_supported() {
        assert_eq!(
            ProbePortError::rejected("busy", 503_u16).to_string(),
            "rejected (503): busy"
        );
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(ProbePortError::closed(), ProbePortError::Closed);
    }
}
