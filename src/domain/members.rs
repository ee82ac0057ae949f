//! Members and author attribution.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::coerce::{RefInput, Reference, read_string};
use crate::domain::error::ClientError;
use crate::domain::groups::{FieldGroup, Group, field_groups, group_list};
use crate::domain::hydrate::{Extensions, Hydrate, assign_id, hydrate};
use crate::infra::http::Client;
use crate::infra::params::Params;

pub(crate) const MEMBERS_PATH: &str = "/core/members";

#[derive(Debug, Clone, Serialize)]
pub struct Member {
    #[serde(skip)]
    client: Client,
    id: Option<u64>,
    name: Option<String>,
    email: Option<String>,
    #[serde(rename = "primaryGroup")]
    primary_group: Option<Group>,
    #[serde(rename = "secondaryGroups")]
    secondary_groups: Vec<Group>,
    #[serde(rename = "customFields")]
    custom_fields: Vec<FieldGroup>,
    #[serde(skip)]
    password: Option<String>,
    #[serde(flatten)]
    extensions: Extensions,
}

impl Member {
    pub fn new(client: &Client) -> Self {
        Self {
            client: client.clone(),
            id: None,
            name: None,
            email: None,
            primary_group: None,
            secondary_groups: Vec::new(),
            custom_fields: Vec::new(),
            password: None,
            extensions: Extensions::default(),
        }
    }

    pub fn from_bag(client: &Client, bag: &Map<String, Value>) -> Self {
        let mut member = Self::new(client);
        hydrate(&mut member, bag);
        member
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> &mut Self {
        self.email = Some(email.into());
        self
    }

    pub fn primary_group(&self) -> Option<&Group> {
        self.primary_group.as_ref()
    }

    pub fn set_primary_group(&mut self, group: impl Into<RefInput<Group>>) -> &mut Self {
        self.primary_group = Some(group.into().resolve(&()));
        self
    }

    /// Assign the primary group from raw JSON.
    ///
    /// Fails with [`ClientError::InvalidGroup`] for anything other than an id
    /// or an object carrying one.
    pub fn set_primary_group_value(&mut self, value: &Value) -> Result<&mut Self, ClientError> {
        let input = RefInput::<Group>::from_value(value).ok_or(ClientError::InvalidGroup)?;
        self.primary_group = Some(input.resolve(&()));
        Ok(self)
    }

    pub fn secondary_groups(&self) -> &[Group] {
        &self.secondary_groups
    }

    pub fn set_secondary_groups(&mut self, groups: &Value) -> &mut Self {
        self.secondary_groups = group_list(groups);
        self
    }

    pub fn custom_fields(&self) -> &[FieldGroup] {
        &self.custom_fields
    }

    pub fn set_custom_fields(&mut self, fields: Vec<FieldGroup>) -> &mut Self {
        self.custom_fields = fields;
        self
    }

    /// Stage a new password for the next save. Never read back.
    pub fn set_password(&mut self, password: impl Into<String>) -> &mut Self {
        self.password = Some(password.into());
        self
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub(crate) fn write_params(&self) -> Params {
        let mut params = Params::new();
        params
            .set_opt("name", self.name.clone())
            .set_opt("email", self.email.clone())
            .set_opt("group", self.primary_group.as_ref().and_then(Group::id));
        if !self.custom_fields.is_empty() {
            params.set(
                "customFields",
                Value::Array(self.custom_fields.iter().map(FieldGroup::to_value).collect()),
            );
        }
        if let Some(password) = &self.password {
            params.set("password", password.clone());
        }
        params
    }
}

impl Hydrate for Member {
    fn assign(&mut self, key: &str, value: &Value) -> Result<bool, ClientError> {
        match key {
            "id" => assign_id(&mut self.id, value)?,
            "name" => self.name = read_string("name", value)?,
            "email" => self.email = read_string("email", value)?,
            "primaryGroup" => {
                self.set_primary_group_value(value)?;
            }
            "secondaryGroups" => {
                self.set_secondary_groups(value);
            }
            "customFields" => self.custom_fields = field_groups(value),
            "password" => self.password = read_string("password", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

impl Reference for Member {
    type Scope = Client;

    fn blank(scope: &Client) -> Self {
        Self::new(scope)
    }

    fn reference_id(&self) -> Option<u64> {
        self.id
    }
}

/// Author reference plus the free-text name used for guest posting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Attribution {
    author: Option<Member>,
    author_name: Option<String>,
}

impl Attribution {
    pub fn author(&self) -> Option<&Member> {
        self.author.as_ref()
    }

    pub(crate) fn set_author(&mut self, client: &Client, author: impl Into<RefInput<Member>>) {
        self.author = Some(author.into().resolve(client));
    }

    /// Explicit guest name, falling back to the author reference's name.
    pub fn author_name(&self) -> Option<&str> {
        self.author_name
            .as_deref()
            .or_else(|| self.author.as_ref().and_then(Member::name))
    }

    pub(crate) fn set_author_name(&mut self, name: impl Into<String>) {
        self.author_name = Some(name.into());
    }

    pub(crate) fn author_id(&self) -> u64 {
        self.author.as_ref().and_then(Member::id).unwrap_or(0)
    }

    pub(crate) fn assign(
        &mut self,
        client: &Client,
        key: &str,
        value: &Value,
    ) -> Result<bool, ClientError> {
        match key {
            "author" => {
                if let Some(input) = RefInput::<Member>::from_value(value) {
                    self.author = Some(input.resolve(client));
                }
            }
            "author_name" => self.author_name = read_string("author_name", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Add `author`, and `author_name` when posting as a guest (author id 0).
    pub(crate) fn write(&self, params: &mut Params) {
        let author = self.author_id();
        params.set("author", author);
        if author == 0 {
            if let Some(name) = self.author_name() {
                params.set("author_name", name.to_string());
            }
        }
    }
}
