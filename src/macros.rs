/// Declares a struct together with its cached field-descriptor table.
///
/// Every field type must implement [`FieldValue`](crate::FieldValue) and the struct
/// must derive `Default`, which serves as its zero-argument factory. Fields without a
/// visibility modifier are recorded as private but are read and written like any other.
/// Fields listed under `read_only` are never written by the mapper.
///
/// ```
/// use graph_mapper::{mappable, MapExt};
///
/// mappable! {
///     #[derive(Debug, Default)]
///     pub struct Source {
///         pub id: i32,
///         secret: String,
///     }
/// }
///
/// mappable! {
///     #[derive(Debug, Default)]
///     pub struct Target {
///         pub id: i32,
///         pub secret: String,
///     }
///     read_only: [secret]
/// }
///
/// let source = Source { id: 7, secret: "hidden".to_string() };
/// let target: Target = source.map_to().unwrap();
/// assert_eq!(target.id, 7);
/// assert_eq!(target.secret, "");
/// ```
#[macro_export]
macro_rules! mappable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),* $(,)?
        }
        $( read_only: [ $($read_only:ident),* $(,)? ] )?
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field : $field_ty
            ),*
        }

        impl $crate::Mappable for $name {
            fn shape(&self) -> &'static $crate::Shape {
                <$name as $crate::MapTarget>::describe()
            }

            fn read_field(&self, name: &str) -> ::std::option::Option<$crate::Value> {
                $(
                    if name == stringify!($field) {
                        return ::std::option::Option::Some(
                            $crate::FieldValue::to_value(&self.$field),
                        );
                    }
                )*
                ::std::option::Option::None
            }

            fn write_field(&mut self, name: &str, value: $crate::Value) -> $crate::Result<()> {
                let shape = <$name as $crate::MapTarget>::describe();
                match shape.field(name) {
                    ::std::option::Option::Some(field) if !field.writable => {
                        return ::std::result::Result::Err($crate::MapperError::FieldNotWritable {
                            shape: shape.name().to_string(),
                            field: name.to_string(),
                        });
                    }
                    _ => {}
                }
                $(
                    if name == stringify!($field) {
                        self.$field = <$field_ty as $crate::FieldValue>::from_value(value)?;
                        return ::std::result::Result::Ok(());
                    }
                )*
                ::std::result::Result::Err($crate::MapperError::UnknownField {
                    shape: shape.name().to_string(),
                    field: name.to_string(),
                })
            }
        }

        impl $crate::MapTarget for $name {
            fn describe() -> &'static $crate::Shape {
                static SHAPE: ::std::sync::OnceLock<$crate::Shape> = ::std::sync::OnceLock::new();
                SHAPE.get_or_init(|| {
                    let _read_only: &[&str] = &[$($(stringify!($read_only)),*)?];
                    $crate::Shape::new(
                        stringify!($name),
                        ::std::vec![
                            $(
                                $crate::FieldDescriptor::declared(
                                    stringify!($field),
                                    <$field_ty as $crate::FieldValue>::field_type(),
                                    stringify!($field_vis).is_empty(),
                                    _read_only.contains(&stringify!($field)),
                                )
                            ),*
                        ],
                        || $crate::ObjectRef::new(<$name as ::std::default::Default>::default()),
                    )
                })
            }
        }
    };
}
