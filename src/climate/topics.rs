//! MQTT topic names.

use super::reading::{Metric, RoomId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topics {
    prefix: String,
}

impl Topics {
    /// `prefix` is prepended verbatim, so "/" yields "/readings/temperature".
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn reading(&self, metric: Metric) -> String {
        format!("{}readings/{}", self.prefix, metric)
    }

    pub fn actuator(&self, room: &RoomId) -> String {
        format!("{}actuators/room-{}/set", self.prefix, room)
    }

    /// Topics the controller subscribes to.
    pub fn subscriptions(&self) -> Vec<String> {
        vec![
            self.reading(Metric::Temperature),
            self.reading(Metric::Motion),
        ]
    }

    /// Map an inbound topic to the metric it carries.
    pub fn metric_for(&self, topic: &str) -> Option<Metric> {
        let rest = topic.strip_prefix(self.prefix.as_str())?;
        match rest.strip_prefix("readings/")? {
            "temperature" => Some(Metric::Temperature),
            "motion" => Some(Metric::Motion),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_topics() {
        let topics = Topics::default();
        assert_eq!(topics.reading(Metric::Temperature), "readings/temperature");
        assert_eq!(
            topics.actuator(&RoomId::new("1").unwrap()),
            "actuators/room-1/set"
        );
        assert_eq!(topics.metric_for("readings/motion"), Some(Metric::Motion));
        assert_eq!(topics.metric_for("/readings/motion"), None);
        assert_eq!(topics.metric_for("readings/humidity"), None);
    }

    #[test]
    fn test_prefixed_topics() {
        let topics = Topics::new("/");
        assert_eq!(topics.subscriptions(), vec![
            "/readings/temperature".to_string(),
            "/readings/motion".to_string(),
        ]);
        assert_eq!(
            topics.metric_for("/readings/temperature"),
            Some(Metric::Temperature)
        );
        assert_eq!(topics.metric_for("readings/temperature"), None);
        assert_eq!(
            topics.actuator(&RoomId::new("kitchen").unwrap()),
            "/actuators/room-kitchen/set"
        );
    }
}
