// Length catalog for one kernel family: `LEN<n>` constants plus `ALL`.
macro_rules! lengths {
    ($name:ident: $($len:literal),+ $(,)?) => {
        paste::paste! {
            pub mod $name {
                use $crate::types::SizeClass;
                $(
                pub const [<LEN $len>]: SizeClass = SizeClass::Len($len);
                )+
                pub const ALL: &[SizeClass] = &[$([<LEN $len>]),+];
            }
        }
    };
}
pub(crate) use lengths;
