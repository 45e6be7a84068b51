//! Sample credentials configurations
//!
//! Each fixture is a complete XML document as an application would ship it.

/// A single static key pair.
pub const STATIC_ONLY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<beans>
  <context-credentials>
    <simple-credentials access-key="AKIA" secret-key="secret"/>
  </context-credentials>
</beans>
"#;

/// Session token first, then instance profile, then a static fallback.
pub const FULL_CHAIN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<beans xmlns:cc="http://www.example.org/schema/credentials">
  <cc:context-credentials>
    <cc:security-token-credentials access-key="AKIASESSION" secret-key="session-secret"/>
    <cc:instance-profile-credentials/>
    <cc:simple-credentials access-key="AKIAFALLBACK" secret-key="fallback-secret"/>
  </cc:context-credentials>
</beans>
"#;

/// Only remote sources; fails unless a collaborator answers.
pub const REMOTE_ONLY: &str = r#"<beans>
  <context-credentials>
    <security-token-credentials access-key="AKIASESSION" secret-key="session-secret"/>
    <instance-profile-credentials/>
  </context-credentials>
</beans>
"#;

/// Declares nothing at all.
pub const EMPTY_DECLARATION: &str = r#"<beans>
  <context-credentials/>
</beans>
"#;

/// Two invalid sources, one problem each.
pub const INVALID_SOURCES: &str = r#"<beans>
  <context-credentials>
    <simple-credentials access-key="" secret-key="secret"/>
    <security-token-credentials access-key="AKIA"/>
  </context-credentials>
</beans>
"#;

/// A document that is not well-formed.
pub const MALFORMED: &str = "<beans><context-credentials></beans>";
