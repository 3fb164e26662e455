//! MQTT topic layout
//!
//! ```text
//! <prefix>/state              retained JSON snapshot, published by the bridge
//! <prefix>/command/<action>   operator commands (volume, power, mute, source,
//!                             bass, treble, balance, send, initialize)
//! ```

/// Topic names under one prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    prefix: String,
}

impl Topics {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Topic the snapshot is published to
    pub fn state(&self) -> String {
        format!("{}/state", self.prefix)
    }

    /// Subscription filter covering every command topic
    pub fn command_filter(&self) -> String {
        format!("{}/command/+", self.prefix)
    }

    /// Action name addressed by a command topic, if the topic is one
    pub fn action<'a>(&self, topic: &'a str) -> Option<&'a str> {
        topic
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix("/command/")
            .filter(|action| !action.is_empty() && !action.contains('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_topic_names() {
        let topics = Topics::new("rotel");
        assert_eq!(topics.state(), "rotel/state");
        assert_eq!(topics.command_filter(), "rotel/command/+");
        assert_eq!(topics.action("rotel/command/volume"), Some("volume"));
    }

    #[rstest]
    #[case("rotel/command/volume", Some("volume"))]
    #[case("rotel/command/send", Some("send"))]
    #[case("rotel/state", None)]
    #[case("rotel/command/", None)]
    #[case("rotel/command/a/b", None)]
    #[case("rotelx/command/volume", None)]
    #[case("other/command/volume", None)]
    fn test_action_from_topic(#[case] topic: &str, #[case] expected: Option<&str>) {
        assert_eq!(Topics::new("rotel").action(topic), expected);
    }
}
