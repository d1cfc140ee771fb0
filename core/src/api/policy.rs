use hashbrown::HashSet;

use crate::host::canonical_function_name;

/// Functions denied by [`UnsafeFunctions::default`]: process control,
/// filesystem and network access, code execution, and anything that can
/// call back into arbitrary callables by name.
pub const DEFAULT_UNSAFE_FUNCTIONS: &[&str] = &[
    // Process execution
    "exec",
    "shell_exec",
    "system",
    "passthru",
    "proc_open",
    "popen",
    "pcntl_exec",
    "pcntl_fork",
    "posix_kill",
    "proc_terminate",
    // Code execution and dynamic dispatch
    "eval",
    "assert",
    "create_function",
    "call_user_func",
    "call_user_func_array",
    "forward_static_call",
    "forward_static_call_array",
    "register_shutdown_function",
    "register_tick_function",
    "array_map",
    "array_filter",
    "array_walk",
    "usort",
    "uasort",
    "uksort",
    "preg_replace_callback",
    "extract",
    "parse_str",
    "putenv",
    "ini_set",
    "set_error_handler",
    "set_exception_handler",
    "unserialize",
    // Filesystem
    "file_get_contents",
    "file_put_contents",
    "file",
    "fopen",
    "readfile",
    "unlink",
    "rename",
    "copy",
    "mkdir",
    "rmdir",
    "touch",
    "chmod",
    "chown",
    "symlink",
    "link",
    "tempnam",
    "move_uploaded_file",
    "glob",
    "scandir",
    "opendir",
    "highlight_file",
    "show_source",
    "parse_ini_file",
    // Network
    "fsockopen",
    "pfsockopen",
    "stream_socket_client",
    "stream_socket_server",
    "curl_exec",
    "curl_multi_exec",
    "mail",
    "header",
    // Information disclosure
    "phpinfo",
    "getenv",
    "get_defined_vars",
    "get_defined_constants",
    "debug_backtrace",
    "var_dump",
    "print_r",
    "var_export",
];

/// The deny-list consulted before every function call.
///
/// Matching is ASCII case-insensitive and ignores a leading `\`, the same
/// way callable names resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsafeFunctions {
    names: HashSet<String>,
}

impl UnsafeFunctions {
    /// A deny-list of exactly `names`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| canonical_function_name(name.as_ref()))
                .collect(),
        }
    }

    /// A deny-list that allows everything.
    pub fn empty() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    pub fn is_denied(&self, name: &str) -> bool {
        self.names.contains(&canonical_function_name(name))
    }

    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(canonical_function_name(name))
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(&canonical_function_name(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Denied names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for UnsafeFunctions {
    fn default() -> Self {
        Self::new(DEFAULT_UNSAFE_FUNCTIONS)
    }
}
