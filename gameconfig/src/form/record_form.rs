use std::rc::Rc;

use crate::{
    data::{Record, RecordHandle},
    error::{GameConfigError, Result},
    form::Field,
    schema::{MemberDescriptor, MemberValue},
};

/// One field per schema member, bound to a single record instance.
#[derive(Debug)]
pub struct RecordForm {
    title: String,
    members: Vec<MemberDescriptor>,
    fields: Vec<Field>,
    record: Option<RecordHandle>,
}

impl RecordForm {
    /// Build an unbound form with one field per member, in member order.
    ///
    /// Member names are unique within a schema, so each label maps to one field.
    pub fn new(members: &[MemberDescriptor]) -> Self {
        Self {
            title: String::new(),
            members: members.to_vec(),
            fields: members.iter().cloned().map(Field::new).collect(),
            record: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.label() == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.label() == name)
    }

    /// Currently bound record.
    pub fn record(&self) -> Option<&RecordHandle> {
        self.record.as_ref()
    }

    /// Bind to a record slot, default-constructing the record if the slot is empty.
    pub fn bind_slot(&mut self, slot: &mut Option<RecordHandle>) -> Result<()> {
        let record = slot
            .get_or_insert_with(|| Record::with_defaults(&self.members).into_handle())
            .clone();
        self.bind(record)
    }

    /// Bind every field to `record`.
    ///
    /// Each field shows the record's current value and writes edits back into
    /// this record only; listeners from a previous binding are dropped. A member
    /// whose stored value does not fit its kind leaves its field disabled and is
    /// reported as [`GameConfigError::MemberTypeMismatch`] after the remaining
    /// fields are bound.
    pub fn bind(&mut self, record: RecordHandle) -> Result<()> {
        let mut mismatch = None;

        for field in &mut self.fields {
            field.clear_value_changed();
            let member = field.member().clone();

            let current = member.read(&record.borrow());
            match current {
                Ok(value) => {
                    field.set_value_without_notify(value)?;
                    field.set_enabled(true);

                    let target = Rc::clone(&record);
                    field.register_value_changed(move |value: &MemberValue| {
                        if let Err(e) = member.write(&mut target.borrow_mut(), value) {
                            warn!("write back failed: {e}");
                        }
                    });
                }
                Err(e) => {
                    warn!("field `{}` disabled: {e}", member.name);
                    field.set_value_without_notify(member.kind.default_value())?;
                    field.set_enabled(false);
                    if mismatch.is_none() {
                        mismatch = Some(e);
                    }
                }
            }
        }

        debug!("form `{}` bound to record", self.title);
        self.record = Some(record);
        match mismatch {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Detach from the bound record; fields keep their values but stop writing.
    pub fn unbind(&mut self) {
        for field in &mut self.fields {
            field.clear_value_changed();
        }
        self.record = None;
    }

    /// Edit a member through its field.
    pub fn edit(&mut self, member: &str, value: MemberValue) -> Result<()> {
        self.field_or_err(member)?.set_value(value)
    }

    /// Edit a member from text, as typed into its field.
    pub fn edit_text(&mut self, member: &str, text: &str) -> Result<()> {
        self.field_or_err(member)?.set_text(text)
    }

    fn field_or_err(&mut self, member: &str) -> Result<&mut Field> {
        self.field_mut(member)
            .ok_or_else(|| GameConfigError::UnknownMember {
                member: member.to_string(),
            })
    }
}
