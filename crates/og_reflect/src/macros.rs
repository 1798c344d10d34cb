/// Implements [`Reflect`](crate::Reflect) and [`Typed`](crate::Typed) for a
/// struct whose fields implement [`ToValue`](crate::ToValue) and
/// [`FromValue`](crate::FromValue).
///
/// Each entry maps a property name, as it appears on the wire, to a struct
/// field. Fields are listed in entry order. The blank instance is the
/// type's [`Default`].
///
/// # Examples
///
/// ```
/// use og_reflect::{ObjectId, Reflect, Value, impl_reflect};
///
/// #[derive(Debug, Default)]
/// struct Post {
///     post_id: i64,
///     title: String,
///     author: Option<ObjectId>,
/// }
///
/// impl_reflect!(Post as "Post" {
///     "postId" => post_id,
///     "title" => title,
///     "author" => author,
/// });
///
/// let mut post = Post::default();
/// post.set_field("postId", Value::Integer(9)).unwrap();
/// assert_eq!(post.post_id, 9);
/// assert!(post.set_field("body", Value::Null).is_err());
/// ```
#[macro_export]
macro_rules! impl_reflect {
    ($ty:ty as $name:literal { $($key:literal => $field:ident),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            #[inline]
            fn type_name(&self) -> &str {
                $name
            }

            fn fields(&self) -> $crate::__macro_exports::Vec<(&str, $crate::Value)> {
                $crate::__macro_exports::vec![
                    $(($key, $crate::ToValue::to_value(&self.$field))),*
                ]
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                name: &str,
                value: $crate::Value,
            ) -> ::core::result::Result<(), $crate::ReflectError> {
                match name {
                    $(
                        $key => {
                            self.$field = $crate::FromValue::from_value(value)?;
                            ::core::result::Result::Ok(())
                        }
                    )*
                    _ => ::core::result::Result::Err($crate::ReflectError::UnknownField {
                        type_name: $crate::__macro_exports::String::from($name),
                        field: $crate::__macro_exports::String::from(name),
                    }),
                }
            }

            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }
        }

        impl $crate::Typed for $ty {
            const TYPE_NAME: &'static str = $name;

            #[inline]
            fn blank() -> Self {
                ::core::default::Default::default()
            }
        }
    };
}
