/// Construct a [`Bson`](crate::Bson) value from a JSON-like literal.
///
/// ```
/// use bsondec::bson;
///
/// let value = bson!({
///     "values": [1, 2, 3],
///     "nested": { "ok": true },
/// });
/// ```
#[macro_export]
macro_rules! bson {
    ($($bson:tt)+) => {
        $crate::bson_internal!($($bson)+)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! bson_internal {
    //////////////////////////////////////////////////////////////////////////
    // TT muncher for arrays: produces a vec![...] of elements.
    //////////////////////////////////////////////////////////////////////////

    // Done with trailing comma.
    (@array [$($elems:expr,)*]) => {
        $crate::bson_internal_vec![$($elems,)*]
    };

    // Done without trailing comma.
    (@array [$($elems:expr),*]) => {
        $crate::bson_internal_vec![$($elems),*]
    };

    // Next element is `null`.
    (@array [$($elems:expr,)*] null $($rest:tt)*) => {
        $crate::bson_internal!(@array [$($elems,)* $crate::bson_internal!(null)] $($rest)*)
    };

    // Next element is an array.
    (@array [$($elems:expr,)*] [$($array:tt)*] $($rest:tt)*) => {
        $crate::bson_internal!(@array [$($elems,)* $crate::bson_internal!([$($array)*])] $($rest)*)
    };

    // Next element is a map.
    (@array [$($elems:expr,)*] {$($map:tt)*} $($rest:tt)*) => {
        $crate::bson_internal!(@array [$($elems,)* $crate::bson_internal!({$($map)*})] $($rest)*)
    };

    // Next element is an expression followed by comma.
    (@array [$($elems:expr,)*] $next:expr, $($rest:tt)*) => {
        $crate::bson_internal!(@array [$($elems,)* $crate::bson_internal!($next),] $($rest)*)
    };

    // Last element is an expression with no trailing comma.
    (@array [$($elems:expr,)*] $last:expr) => {
        $crate::bson_internal!(@array [$($elems,)* $crate::bson_internal!($last)])
    };

    // Comma after the most recent element.
    (@array [$($elems:expr),*] , $($rest:tt)*) => {
        $crate::bson_internal!(@array [$($elems,)*] $($rest)*)
    };

    //////////////////////////////////////////////////////////////////////////
    // TT muncher for objects: inserts entries into the given document.
    //////////////////////////////////////////////////////////////////////////

    // Done.
    (@object $object:ident () () ()) => {};

    // Insert the current entry followed by trailing comma.
    (@object $object:ident [$($key:tt)+] ($value:expr) , $($rest:tt)*) => {
        let _ = $object.insert(($($key)+), $value);
        $crate::bson_internal!(@object $object () ($($rest)*) ($($rest)*));
    };

    // Insert the last entry without trailing comma.
    (@object $object:ident [$($key:tt)+] ($value:expr)) => {
        let _ = $object.insert(($($key)+), $value);
    };

    // Next value is `null`.
    (@object $object:ident ($($key:tt)+) (: null $($rest:tt)*) $copy:tt) => {
        $crate::bson_internal!(@object $object [$($key)+] ($crate::bson_internal!(null)) $($rest)*);
    };

    // Next value is an array.
    (@object $object:ident ($($key:tt)+) (: [$($array:tt)*] $($rest:tt)*) $copy:tt) => {
        $crate::bson_internal!(@object $object [$($key)+] ($crate::bson_internal!([$($array)*])) $($rest)*);
    };

    // Next value is a map.
    (@object $object:ident ($($key:tt)+) (: {$($map:tt)*} $($rest:tt)*) $copy:tt) => {
        $crate::bson_internal!(@object $object [$($key)+] ($crate::bson_internal!({$($map)*})) $($rest)*);
    };

    // Next value is an expression followed by comma.
    (@object $object:ident ($($key:tt)+) (: $value:expr , $($rest:tt)*) $copy:tt) => {
        $crate::bson_internal!(@object $object [$($key)+] ($crate::bson_internal!($value)) , $($rest)*);
    };

    // Last value is an expression with no trailing comma.
    (@object $object:ident ($($key:tt)+) (: $value:expr) $copy:tt) => {
        $crate::bson_internal!(@object $object [$($key)+] ($crate::bson_internal!($value)));
    };

    // Munch a token into the current key.
    (@object $object:ident ($($key:tt)*) ($tt:tt $($rest:tt)*) $copy:tt) => {
        $crate::bson_internal!(@object $object ($($key)* $tt) ($($rest)*) ($($rest)*));
    };

    //////////////////////////////////////////////////////////////////////////
    // Primary entry points.
    //////////////////////////////////////////////////////////////////////////

    (null) => {
        $crate::Bson::Null
    };

    ([]) => {
        $crate::Bson::Array(::std::vec::Vec::new())
    };

    ([ $($tt:tt)+ ]) => {
        $crate::Bson::Array($crate::bson_internal!(@array [] $($tt)+))
    };

    ({}) => {
        $crate::Bson::Document($crate::Document::new())
    };

    ({ $($tt:tt)+ }) => {{
        let mut object = $crate::Document::new();
        $crate::bson_internal!(@object object () ($($tt)+) ($($tt)+));
        $crate::Bson::Document(object)
    }};

    // Any Into<Bson> expression.
    ($other:expr) => {
        $crate::Bson::from($other)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! bson_internal_vec {
    ($($content:expr),* $(,)?) => {
        <[_]>::into_vec(::std::boxed::Box::new([$($content),*]))
    };
}

/// Construct a [`Document`](crate::Document) from a JSON-like literal.
///
/// ```
/// use bsondec::doc;
///
/// let doc = doc! {
///     "name": "bsondec",
///     "year": 2021,
/// };
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::Document::new()
    };
    ( $($tt:tt)+ ) => {{
        let mut object = $crate::Document::new();
        $crate::bson_internal!(@object object () ($($tt)+) ($($tt)+));
        object
    }};
}

/// Implement the record-target traits for a struct, wiring its fields to
/// BSON element names.
///
/// The struct must implement [`Default`] (the reset prototype). Three entry
/// sections are supported: `fields` maps element names to plain fields,
/// `inline` flattens sub-records into this record's namespace, and `rest`
/// names a map field that absorbs unmatched element names.
///
/// ```
/// use bsondec::{de::from_slice, impl_record, Document};
///
/// #[derive(Default)]
/// struct Server {
///     host: String,
///     port: u16,
///     extra: Document,
/// }
///
/// impl_record! {
///     Server {
///         fields: { "host" => host, "port" => port },
///         rest: extra,
///     }
/// }
///
/// let bytes = b"\x1c\x00\x00\x00\x02host\x00\x03\x00\x00\x00db\x00\x10port\x00\x1b\x00\x00\x00\x00";
/// let mut server = Server::default();
/// from_slice(bytes, &mut server)?;
/// assert_eq!(server.host, "db");
/// assert_eq!(server.port, 27);
/// # Ok::<(), bsondec::error::Error>(())
/// ```
#[macro_export]
macro_rules! impl_record {
    // records whose fields borrow from the input buffer carry the buffer
    // lifetime as their single generic parameter
    ($ty:ident<$de:lifetime> { $($body:tt)* }) => {
        $crate::impl_record!(@impl [<$de>] [$de] [$ty<$de>] [$ty<'static>] { $($body)* });
    };
    ($ty:ident { $($body:tt)* }) => {
        $crate::impl_record!(@impl [] ['de] [$ty] [$ty] { $($body)* });
    };
    (@impl [$($generics:tt)*] [$de:lifetime] [$($self_ty:tt)*] [$($key_ty:tt)*] {
        fields: { $($name:literal => $field:ident),* $(,)? }
        $(, inline: { $($ifield:ident: $ity:ty),* $(,)? })?
        $(, rest: $rest:ident)?
        $(,)?
    }) => {
        impl$($generics)* $($self_ty)* {
            #[doc(hidden)]
            fn __bsondec_field_index() -> &'static $crate::de::FieldIndex {
                $crate::de::FieldIndex::of::<$($key_ty)*>(|| {
                    let builder = $crate::de::FieldIndex::builder();
                    $(let builder = builder.field($name, stringify!($field));)*
                    $($(let builder =
                        builder.inline(stringify!($ifield), <$ity>::__bsondec_field_index());)*)?
                    $(let builder = builder.catch_all(stringify!($rest));)?
                    builder.build()
                })
            }
        }

        impl<$de> $crate::de::RecordTarget<$de> for $($self_ty)* {
            fn field_index(&self) -> &'static $crate::de::FieldIndex {
                Self::__bsondec_field_index()
            }

            fn reset(&mut self) {
                *self = ::std::default::Default::default();
            }

            fn field_slot(
                &mut self,
                path: &$crate::de::FieldPath,
            ) -> ::std::option::Option<$crate::de::Slot<'_, $de>> {
                let (head, rest) = path.split_first()?;
                $(
                    if *head == stringify!($field) && rest.is_empty() {
                        return ::std::option::Option::Some(
                            $crate::de::DecodeTarget::slot(&mut self.$field),
                        );
                    }
                )*
                $($(
                    if *head == stringify!($ifield) {
                        return $crate::de::RecordTarget::field_slot(&mut self.$ifield, rest);
                    }
                )*)?
                $(
                    if *head == stringify!($rest) && rest.is_empty() {
                        return ::std::option::Option::Some(
                            $crate::de::DecodeTarget::slot(&mut self.$rest),
                        );
                    }
                )?
                ::std::option::Option::None
            }
        }

        impl<$de> $crate::de::DecodeTarget<$de> for $($self_ty)* {
            fn slot(&mut self) -> $crate::de::Slot<'_, $de> {
                $crate::de::Slot::Record(self)
            }
        }
    };
}

/// Implement [`DecodeTarget`](crate::de::DecodeTarget) for a type that
/// decodes itself through [`SetBson`](crate::de::SetBson).
#[macro_export]
macro_rules! impl_hook {
    ($ty:ty) => {
        impl<'de> $crate::de::DecodeTarget<'de> for $ty {
            fn slot(&mut self) -> $crate::de::Slot<'_, 'de> {
                $crate::de::Slot::Hook(self)
            }
        }
    };
}
