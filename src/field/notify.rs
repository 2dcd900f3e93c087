//! Outbound notifications.
//!
//! Every change to the collection is announced three ways: one attribute
//! change per output binding (`emailCollection` and `emailList`) and one
//! generic `emailschanged` event for listeners outside the host's binding
//! mechanism. All three carry the same values.

use serde::Serialize;

/// The field's output bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputAttribute {
    /// The accepted addresses as an array.
    #[serde(rename = "emailCollection")]
    EmailCollection,
    /// The accepted addresses joined by commas.
    #[serde(rename = "emailList")]
    EmailList,
}

/// The value carried by an attribute change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// An array of addresses.
    List(Vec<String>),
    /// A comma-joined string of addresses.
    Text(String),
}

/// A message from the field to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Notification {
    /// A bound output attribute has a new value.
    AttributeChanged {
        /// Which binding changed.
        name: OutputAttribute,
        /// Its new value.
        value: AttributeValue,
    },
    /// The generic change event.
    #[serde(rename = "emailschanged", rename_all = "camelCase")]
    EmailsChanged {
        /// The accepted addresses.
        emails: Vec<String>,
        /// The same addresses joined by commas.
        email_list: String,
    },
}

/// The notifications announcing that the collection now holds `emails`.
pub fn change_set(emails: &[String]) -> [Notification; 3] {
    let email_list = emails.join(",");
    [
        Notification::AttributeChanged {
            name: OutputAttribute::EmailCollection,
            value: AttributeValue::List(emails.to_vec()),
        },
        Notification::AttributeChanged {
            name: OutputAttribute::EmailList,
            value: AttributeValue::Text(email_list.clone()),
        },
        Notification::EmailsChanged {
            emails: emails.to_vec(),
            email_list,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_set_carries_array_and_joined_forms() {
        let emails = vec!["a@x.com".to_string(), "b@x.com".to_string()];
        let [collection, list, generic] = change_set(&emails);

        assert_eq!(
            collection,
            Notification::AttributeChanged {
                name: OutputAttribute::EmailCollection,
                value: AttributeValue::List(emails.clone()),
            }
        );
        assert_eq!(
            list,
            Notification::AttributeChanged {
                name: OutputAttribute::EmailList,
                value: AttributeValue::Text("a@x.com,b@x.com".to_string()),
            }
        );
        assert_eq!(
            generic,
            Notification::EmailsChanged {
                emails,
                email_list: "a@x.com,b@x.com".to_string(),
            }
        );
    }

    #[test]
    fn serializes_with_host_names() {
        let [collection, _, generic] = change_set(&["a@x.com".to_string()]);
        assert_eq!(
            serde_json::to_value(&collection).unwrap(),
            serde_json::json!({
                "event": "attributeChanged",
                "name": "emailCollection",
                "value": ["a@x.com"],
            })
        );
        assert_eq!(
            serde_json::to_value(&generic).unwrap(),
            serde_json::json!({
                "event": "emailschanged",
                "emails": ["a@x.com"],
                "emailList": "a@x.com",
            })
        );
    }
}
