//! Sample documents shared by the unit tests.

pub(crate) const HEART_RATE: &str = "<heart-rate><when><date><y>2024</y><m>3</m><d>14</d></date><time><h>9</h><m>5</m></time></when><value>72</value><measurement-method><text>Pulse oximeter</text><code><value>pulse-ox</value><family>wc</family><type>heart-rate-measurement-method</type></code></measurement-method></heart-rate>";

pub(crate) const INSULIN_INJECTION: &str = r#"<insulin-injection><when><date><y>2024</y><m>3</m><d>14</d></date><time><h>7</h><m>45</m></time></when><type><text>Rapid acting</text><code><value>rapid</value><type>insulin-types</type></code></type><amount><iu>4.5</iu><display units="IU">4.5 units</display></amount><device-id>PEN-0042</device-id></insulin-injection>"#;

pub(crate) const ENCOUNTER: &str = "<encounter><when><date><y>2024</y><m>2</m><d>1</d></date><time><h>10</h><m>30</m></time></when><type><text>Outpatient</text></type><reason>Annual review</reason><duration><start-date><structured><date><y>2024</y><m>2</m><d>1</d></date><time><h>10</h><m>30</m></time></structured></start-date><end-date><structured><date><y>2024</y><m>2</m><d>1</d></date><time><h>11</h><m>15</m></time></structured></end-date></duration><consent-granted>true</consent-granted><facility><name>Riverside Clinic</name></facility></encounter>";

pub(crate) const RESPIRATORY_PROFILE: &str = r#"<respiratory-profile><when><date><y>2024</y><m>1</m><d>8</d></date></when><expiratory-flow-red-zone-upper-boundary><liters-per-second>3</liters-per-second></expiratory-flow-red-zone-upper-boundary><expiratory-flow-yellow-zone-upper-boundary><liters-per-second>6.5</liters-per-second><display units="L/min">390</display></expiratory-flow-yellow-zone-upper-boundary></respiratory-profile>"#;

pub(crate) const AUDIT: &str = r#"<audit><timestamp>2024-03-14T09:05:30Z</timestamp><app-id name="Glucose Tracker">1f3a9c2e-5b7d-4e21-9a0c-3d4e5f6a7b8c</app-id><person-id name="Alex Doe">7c2d4e6f-8a9b-4c1d-8e2f-3a4b5c6d7e8f</person-id><access-avenue>Offline</access-avenue><audit-action>Updated</audit-action></audit>"#;

pub(crate) const THING: &str = r#"<thing><thing-id version-stamp="0f1e2d3c-4b5a-4978-8695-a4b3c2d1e0f9">9a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d</thing-id><type-id name="Heart Rate">b81eb4a6-6eac-4292-ae93-3872d6870994</type-id><thing-state>Active</thing-state><flags>0</flags><eff-date>2024-03-14T09:05:00</eff-date><created><timestamp>2024-03-14T09:06:00Z</timestamp><app-id name="Glucose Tracker">1f3a9c2e-5b7d-4e21-9a0c-3d4e5f6a7b8c</app-id><access-avenue>Online</access-avenue><audit-action>Created</audit-action></created><data-xml><heart-rate><when><date><y>2024</y><m>3</m><d>14</d></date><time><h>9</h><m>5</m></time></when><value>72</value><measurement-method><text>Pulse oximeter</text><code><value>pulse-ox</value><family>wc</family><type>heart-rate-measurement-method</type></code></measurement-method></heart-rate><common><source>Wrist monitor</source><tags>resting, morning</tags></common></data-xml></thing>"#;
