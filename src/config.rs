//! Binding rules that decide how a contract's methods become wire operations.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

static DEFAULT: Lazy<BinderConfiguration> =
    Lazy::new(|| BinderConfiguration(Arc::new(BinderOptions::default())));

/// How method names are spelled in the wire path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodNaming {
    /// Use the method name as declared.
    #[default]
    AsIs,
    /// `say_hello` becomes `SayHello`.
    PascalCase,
    /// `SayHello` becomes `say_hello`; a run of capitals is one word, so
    /// `HTTPGet` becomes `http_get`.
    SnakeCase,
}

impl MethodNaming {
    pub fn apply(self, method: &str) -> String {
        match self {
            MethodNaming::AsIs => method.to_owned(),
            MethodNaming::PascalCase => method
                .split('_')
                .filter(|word| !word.is_empty())
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                })
                .collect(),
            MethodNaming::SnakeCase => {
                let chars: Vec<char> = method.chars().collect();
                let mut out = String::with_capacity(method.len() + 4);
                for (i, &c) in chars.iter().enumerate() {
                    if c.is_uppercase() {
                        // A capital starts a word after a lowercase letter or digit, or
                        // when it ends a run of capitals: `HTTPGet` is `http_get`.
                        let prev = i.checked_sub(1).map(|p| chars[p]);
                        let next = chars.get(i + 1);
                        let boundary = match prev {
                            Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                            Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                            _ => false,
                        };
                        if boundary && !out.ends_with('_') {
                            out.push('_');
                        }
                        out.extend(c.to_lowercase());
                    } else {
                        out.push(c);
                    }
                }
                out
            }
        }
    }
}

/// Raw, deserializable binding options. Freeze them into a
/// [`BinderConfiguration`] before handing them to a factory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderOptions {
    /// Prefix for service names, e.g. `greet.v1`.
    pub package: Option<String>,
    pub naming: MethodNaming,
}

/// Immutable binding rules, used as a cache partition key.
///
/// Equality is identity: two configurations built separately from equal
/// options are still different keys. [`BinderConfiguration::default`] always
/// hands out the one process-wide default instance.
#[derive(Clone)]
pub struct BinderConfiguration(Arc<BinderOptions>);

impl BinderConfiguration {
    pub fn new(options: BinderOptions) -> Self {
        Self(Arc::new(options))
    }

    /// The process-wide default configuration, by reference.
    pub fn default_ref() -> &'static BinderConfiguration {
        &DEFAULT
    }

    pub fn is_default(&self) -> bool {
        Arc::ptr_eq(&self.0, &DEFAULT.0)
    }

    pub fn options(&self) -> &BinderOptions {
        &self.0
    }

    /// Wire path for `method` of `service`, e.g. `/greet.v1.Greeter/SayHello`.
    pub fn operation_path(&self, service: &str, method: &str) -> String {
        let method = self.0.naming.apply(method);
        match &self.0.package {
            Some(package) if !package.is_empty() => format!("/{package}.{service}/{method}"),
            _ => format!("/{service}/{method}"),
        }
    }
}

impl Default for BinderConfiguration {
    fn default() -> Self {
        DEFAULT.clone()
    }
}

impl PartialEq for BinderConfiguration {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for BinderConfiguration {}

impl From<BinderOptions> for BinderConfiguration {
    fn from(options: BinderOptions) -> Self {
        Self::new(options)
    }
}

impl fmt::Debug for BinderConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinderConfiguration")
            .field("default", &self.is_default())
            .field("options", &*self.0)
            .finish()
    }
}
