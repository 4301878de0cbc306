//! Template types for typed variable injection.

use std::marker::PhantomData;

/// A set of values substituted into a template's placeholders.
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Static template text bound to the variable set it accepts.
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }

    pub const fn content(&self) -> &'static str {
        self.content
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}
