/// Build a [`Values`](crate::Values) store from `key => value` pairs.
///
/// ```
/// use errkind::{values, ValueAccess};
///
/// let v = values! { "path" => "/tmp/x", "attempt" => 3 };
/// assert_eq!(v.get_int("attempt"), Some(3));
/// ```
#[macro_export]
macro_rules! values {
    () => {
        $crate::Values::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut values = $crate::Values::new();
        $( values.insert($key, $value); )+
        values
    }};
}

/// Declare process-lifetime templates as lazily initialised statics.
///
/// Each item expands to a `static NAME: LazyLock<Template>`; the template
/// is built on first use and keeps one identity for the whole process.
///
/// ```
/// use errkind::{define_template, ValueAccess};
///
/// define_template! {
///     /// Opening a file failed.
///     pub static ERR_OPEN = "can not open file %s";
///
///     /// Quota exhausted; callers may retry later.
///     pub static ERR_QUOTA = "quota exceeded" { "retryable" => true };
/// }
///
/// let err = ERR_OPEN.args(["data.bin"]);
/// assert_eq!(err.to_string(), "can not open file data.bin");
/// assert!(err.is_instance_of(&ERR_OPEN));
/// assert_eq!(ERR_QUOTA.instantiate().get_bool("retryable"), Some(true));
/// ```
#[macro_export]
macro_rules! define_template {
    () => {};

    (
        $(#[$meta:meta])*
        $vis:vis static $name:ident = $msg:literal;
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        $vis static $name: ::std::sync::LazyLock<$crate::Template> =
            ::std::sync::LazyLock::new(|| $crate::Template::new($msg));

        $crate::define_template! { $($rest)* }
    };

    (
        $(#[$meta:meta])*
        $vis:vis static $name:ident = $msg:literal { $($key:expr => $value:expr),* $(,)? };
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        $vis static $name: ::std::sync::LazyLock<$crate::Template> =
            ::std::sync::LazyLock::new(|| {
                $crate::Template::with_values($msg, $crate::values! { $($key => $value),* })
            });

        $crate::define_template! { $($rest)* }
    };
}
