/// Where a record was logged from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    pub function: &'a str,
    pub line: u32,
}

impl<'a> CallSite<'a> {
    pub fn new(function: &'a str, line: u32) -> Self {
        CallSite { function, line }
    }
}

/// Reduce a `type_name` path of a nested marker fn to the enclosing function's name.
///
/// `my_crate::server::run::{{closure}}::__f` becomes `run`.
pub fn short_function_name(path: &'static str) -> &'static str {
    let mut name = path.strip_suffix("::__f").unwrap_or(path);
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    match name.rfind("::") {
        Some(pos) => &name[pos + 2..],
        None => name,
    }
}

/// Expands to the bare name of the enclosing function.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        $crate::call_site::short_function_name(type_name_of(__f))
    }};
}

/// Expands to a [`CallSite`](crate::CallSite) for the current function and line.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::call_site::CallSite::new($crate::function_name!(), ::core::line!())
    };
}
