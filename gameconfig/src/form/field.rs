use std::fmt;

use crate::{
    error::{GameConfigError, Result},
    schema::{MemberDescriptor, MemberKind, MemberValue},
};

/// Callback fired with the new value after a field changes.
pub type ChangeCallback = Box<dyn FnMut(&MemberValue)>;

/// A labeled, typed input field.
///
/// A field holds at most one change callback; registering another one
/// replaces it.
pub struct Field {
    member: MemberDescriptor,
    value: MemberValue,
    enabled: bool,
    on_change: Option<ChangeCallback>,
}

impl Field {
    pub fn new(member: MemberDescriptor) -> Self {
        let value = member.kind.default_value();
        Self {
            member,
            value,
            enabled: true,
            on_change: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.member.name
    }

    pub fn kind(&self) -> MemberKind {
        self.member.kind
    }

    pub fn member(&self) -> &MemberDescriptor {
        &self.member
    }

    pub fn value(&self) -> &MemberValue {
        &self.value
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn has_listener(&self) -> bool {
        self.on_change.is_some()
    }

    /// Replace the displayed value without firing the change callback.
    pub fn set_value_without_notify(&mut self, value: MemberValue) -> Result<()> {
        self.member.check(&value)?;
        self.value = value;
        Ok(())
    }

    /// Change the value as a user edit would.
    ///
    /// The callback fires once if the value differs from the current one.
    pub fn set_value(&mut self, value: MemberValue) -> Result<()> {
        if !self.enabled {
            return Err(GameConfigError::FieldDisabled {
                member: self.member.name.clone(),
            });
        }
        self.member.check(&value)?;
        if value == self.value {
            return Ok(());
        }
        self.value = value;
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.value);
        }
        Ok(())
    }

    /// Parse text for this field's kind and apply it as an edit.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        let value = self.member.parse_value(text)?;
        self.set_value(value)
    }

    /// Register the change callback, dropping any previous one.
    pub fn register_value_changed(&mut self, callback: impl FnMut(&MemberValue) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn clear_value_changed(&mut self) {
        self.on_change = None;
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("member", &self.member)
            .field("value", &self.value)
            .field("enabled", &self.enabled)
            .field("has_listener", &self.on_change.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    fn score() -> Field {
        Field::new(MemberDescriptor::new("Score", MemberKind::Float32))
    }

    #[test]
    fn test_without_notify_skips_callback() {
        let fired = Rc::new(Cell::new(0));
        let mut field = score();
        let counter = Rc::clone(&fired);
        field.register_value_changed(move |_| counter.set(counter.get() + 1));

        field.set_value_without_notify(MemberValue::Float32(1.0)).unwrap();
        assert_eq!(fired.get(), 0);

        field.set_value(MemberValue::Float32(2.0)).unwrap();
        field.set_value(MemberValue::Float32(2.0)).unwrap();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_register_replaces_listener() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut field = score();

        let c = Rc::clone(&first);
        field.register_value_changed(move |_| c.set(c.get() + 1));
        let c = Rc::clone(&second);
        field.register_value_changed(move |_| c.set(c.get() + 1));

        field.set_text("5").unwrap();
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_disabled_and_mismatch() {
        let mut field = score();
        assert!(field.set_value(MemberValue::Int32(1)).is_err());
        assert!(field.set_value_without_notify(MemberValue::Bool(true)).is_err());

        field.set_enabled(false);
        let err = field.set_value(MemberValue::Float32(1.0)).unwrap_err();
        assert!(matches!(err, GameConfigError::FieldDisabled { .. }));
        assert_eq!(field.value(), &MemberValue::Float32(0.0));
    }
}
