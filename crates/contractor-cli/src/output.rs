//! Output rendering: handlebars detail views, tables for lists, or JSON.

use cinp::uri;
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use serde_json::Value;

use crate::error::{CliError, CliResult};

/// One table column: header and the template rendering its cell.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub template: &'static str,
}

/// Shorthand for building column lists.
#[must_use]
pub const fn col(header: &'static str, template: &'static str) -> Column {
    Column { header, template }
}

handlebars_helper!(short_id: |value: Value| match value {
    Value::String(s) => uri::short_id(&s),
    _ => String::new(),
});

handlebars_helper!(join: |value: Value, {short: bool = false}| match value {
    Value::Array(items) => items
        .iter()
        .map(|item| match item {
            Value::String(s) if short => uri::short_id(s),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", "),
    _ => String::new(),
});

handlebars_helper!(yesno: |value: Value| {
    if value.as_bool().unwrap_or(false) { "yes" } else { "no" }
});

handlebars_helper!(pretty_json: |value: Value| {
    serde_json::to_string_pretty(&value).unwrap_or_default()
});

handlebars_helper!(percent: |value: f64| format!("{value:.1}"));

/// Provider credentials, left out of every rendered view.
const SECRET_FIELDS: &[&str] = &[
    "amt_password",
    "ipmi_password",
    "proxmox_password",
    "vcenter_password",
    "azure_password",
    "packet_auth_token",
];

const TEMPLATES: &[(&str, &str)] = &[
    (
        "site",
        "Name:           {{name}}
Zone:           {{zone}}
Description:    {{description}}
Parent:         {{short_id parent}}
Config Values:  {{json config_values}}
Created:        {{created}}
Updated:        {{updated}}",
    ),
    (
        "foundation_blueprint",
        "Name:                      {{name}}
Description:               {{description}}
Parents:                   {{join parent_list short=true}}
Foundation Types:          {{join foundation_type_list}}
Physical Interface Names:  {{join physical_interface_names}}
Template:                  {{json template}}
Config Values:             {{json config_values}}
Created:                   {{created}}
Updated:                   {{updated}}",
    ),
    (
        "structure_blueprint",
        "Name:                   {{name}}
Description:            {{description}}
Parents:                {{join parent_list short=true}}
Foundation BluePrints:  {{join foundation_blueprint_list short=true}}
Config Values:          {{json config_values}}
Created:                {{created}}
Updated:                {{updated}}",
    ),
    (
        "foundation",
        "Locator:    {{locator}}
Type:       {{type}}
Site:       {{short_id site}}
BluePrint:  {{short_id blueprint}}
State:      {{state}}
Structure:  {{short_id structure}}
Classes:    {{join class_list}}
Id Map:     {{json id_map}}
Located:    {{located_at}}
Built:      {{built_at}}
Created:    {{created}}
Updated:    {{updated}}",
    ),
    (
        "structure",
        "Id:             {{id}}
Hostname:       {{hostname}}
Site:           {{short_id site}}
BluePrint:      {{short_id blueprint}}
Foundation:     {{short_id foundation}}
State:          {{state}}
Config UUID:    {{config_uuid}}
Config Values:  {{json config_values}}
Built:          {{built_at}}
Created:        {{created}}
Updated:        {{updated}}",
    ),
    (
        "complex",
        "Name:         {{name}}
Type:         {{type}}
Site:         {{short_id site}}
Description:  {{description}}
State:        {{state}}
Built %:      {{built_percentage}}
Members:      {{join members short=true}}
Created:      {{created}}
Updated:      {{updated}}",
    ),
    (
        "network",
        "Id:       {{id}}
Name:     {{name}}
Site:     {{short_id site}}
MTU:      {{mtu}}
Created:  {{created}}
Updated:  {{updated}}",
    ),
    (
        "address_block",
        "Id:              {{id}}
Name:            {{name}}
Site:            {{short_id site}}
Subnet:          {{subnet}}/{{prefix}}
Netmask:         {{netmask}}
Gateway:         {{gateway}}
Gateway Offset:  {{gateway_offset}}
Size:            {{size}}
Created:         {{created}}
Updated:         {{updated}}",
    ),
    (
        "address",
        "Id:              {{id}}
Address Block:   {{short_id address_block}}
Offset:          {{offset}}
Ip Address:      {{ip_address}}
Networked:       {{short_id networked}}
Interface:       {{interface_name}}
Sub Interface:   {{sub_interface}}
Vlan:            {{vlan}}
Primary:         {{yesno is_primary}}",
    ),
    (
        "usage",
        "Size:       {{size}}
Addresses:  {{addresses}}
Reserved:   {{reserved}}
Dynamic:    {{dynamic}}
Free:       {{free}}
Used:       {{percent percent_used}}%",
    ),
    (
        "job",
        "Id:          {{id}}
Site:        {{short_id site}}
Script:      {{script_name}}
State:       {{state}}
Message:     {{message}}
Can Start:   {{yesno can_start}}
Max Time:    {{max_time}}
Status:      {{json status}}
Created:     {{created}}
Updated:     {{updated}}",
    ),
    (
        "plot",
        "Name:         {{name}}
Corners:      {{corners}}
Description:  {{description}}
Parent:       {{short_id parent}}
Created:      {{created}}
Updated:      {{updated}}",
    ),
    (
        "cartographer",
        "Identifier:    {{identifier}}
Message:       {{message}}
Foundation:    {{short_id foundation}}
Last Checkin:  {{last_checkin}}
Created:       {{created}}
Updated:       {{updated}}",
    ),
];

/// Renders command results as text or JSON.
pub struct Renderer {
    json: bool,
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Build a renderer; `json` selects indented JSON output.
    ///
    /// # Errors
    /// Fails if a built-in template does not parse.
    pub fn new(json: bool) -> CliResult<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_helper("short_id", Box::new(short_id));
        registry.register_helper("join", Box::new(join));
        registry.register_helper("yesno", Box::new(yesno));
        registry.register_helper("json", Box::new(pretty_json));
        registry.register_helper("percent", Box::new(percent));

        for (name, template) in TEMPLATES {
            registry
                .register_template_string(name, template)
                .map_err(|e| CliError::Render(format!("template {name}: {e}")))?;
        }

        Ok(Self { json, registry })
    }

    /// Whether output is JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Detail view of one object using the named template.
    ///
    /// # Errors
    /// Fails on serialization or template errors.
    pub fn detail<T: Serialize>(&self, template: &str, value: &T) -> CliResult<String> {
        if self.json {
            return Ok(serde_json::to_string_pretty(value)?);
        }
        Ok(self.registry.render(template, value)?)
    }

    /// Detail view followed by `extra` fields of the object, one per line.
    ///
    /// Used for provider subtypes, which share the base template.
    ///
    /// # Errors
    /// As for [`Renderer::detail`].
    pub fn detail_with<T: Serialize>(
        &self,
        template: &str,
        value: &T,
        extra: &[(&str, &str)],
    ) -> CliResult<String> {
        let mut fields = serde_json::to_value(value)?;
        if let Value::Object(map) = &mut fields {
            for secret in SECRET_FIELDS {
                map.remove(*secret);
            }
        }
        if self.json {
            return Ok(serde_json::to_string_pretty(&fields)?);
        }

        let mut output = self.registry.render(template, &fields)?;
        let width = extra.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 2;
        for (label, field) in extra {
            let text = match fields.get(*field) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };
            output.push('\n');
            output.push_str(format!("{:<width$}{text}", format!("{label}:")).trim_end());
        }
        Ok(output)
    }

    /// Table of objects, one row per object.
    ///
    /// # Errors
    /// Fails on serialization or template errors.
    pub fn table<T: Serialize>(&self, columns: &[Column], items: &[T]) -> CliResult<String> {
        if self.json {
            return Ok(serde_json::to_string_pretty(items)?);
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(
            columns
                .iter()
                .map(|c| Cell::new(c.header).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );

        for item in items {
            let row = columns
                .iter()
                .map(|c| self.registry.render_template(c.template, item).map(Cell::new))
                .collect::<Result<Vec<_>, _>>()?;
            table.add_row(row);
        }

        Ok(table.to_string())
    }

    /// Raw value returned by a remote action.
    ///
    /// # Errors
    /// Fails on serialization errors.
    pub fn value(&self, value: &Value) -> CliResult<String> {
        match value {
            Value::String(s) if !self.json => Ok(s.clone()),
            Value::Null if !self.json => Ok(String::new()),
            _ => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    /// Confirmation for a command without a result object.
    ///
    /// # Errors
    /// Fails on serialization errors.
    pub fn done(&self, message: &str) -> CliResult<String> {
        if self.json {
            return Ok(serde_json::to_string_pretty(
                &serde_json::json!({ "result": message }),
            )?);
        }
        Ok(format!("{} {}", "✓".green().bold(), message))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_detail_uses_helpers_without_escaping() {
        let renderer = Renderer::new(false).unwrap();
        let output = renderer
            .detail(
                "site",
                &json!({
                    "name": "main",
                    "description": "<east> & west",
                    "parent": "/api/v1/Site/Site:root:"
                }),
            )
            .unwrap();

        assert!(output.contains("Name:           main"));
        assert!(output.contains("<east> & west"));
        assert!(output.contains("Parent:         root"));
    }

    #[test]
    fn test_table_renders_cells() {
        let renderer = Renderer::new(false).unwrap();
        let columns = [
            col("Name", "{{name}}"),
            col("Blueprints", "{{join list short=true}}"),
            col("Primary", "{{yesno primary}}"),
        ];
        let output = renderer
            .table(
                &columns,
                &[json!({
                    "name": "web",
                    "list": [
                        "/api/v1/BluePrint/StructureBluePrint:linux:",
                        "/api/v1/BluePrint/StructureBluePrint:web:"
                    ],
                    "primary": true
                })],
            )
            .unwrap();

        assert!(output.contains("Name"));
        assert!(output.contains("linux, web"));
        assert!(output.contains("yes"));
    }

    #[test]
    fn test_json_mode() {
        let renderer = Renderer::new(true).unwrap();
        let output = renderer
            .table(&[col("Name", "{{name}}")], &[json!({"name": "a"})])
            .unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, json!([{"name": "a"}]));

        let output = renderer.value(&json!("Started")).unwrap();
        assert_eq!(output, "\"Started\"");
    }

    #[test]
    fn test_detail_with_extra_fields() {
        let renderer = Renderer::new(false).unwrap();
        let output = renderer
            .detail_with(
                "foundation",
                &json!({"locator": "n1", "ipmi_ip_address": "10.0.0.5"}),
                &[("IPMI Address", "ipmi_ip_address"), ("SOL Port", "ipmi_sol_port")],
            )
            .unwrap();

        assert!(output.contains("Locator:    n1"));
        assert!(output.contains("IPMI Address: 10.0.0.5"));
        assert!(output.ends_with("SOL Port:"));
    }

    #[test]
    fn test_detail_with_hides_credentials() {
        let object = json!({
            "locator": "n1",
            "ipmi_username": "admin",
            "ipmi_password": "hunter2"
        });

        let output = Renderer::new(true)
            .unwrap()
            .detail_with("foundation", &object, &[("IPMI Username", "ipmi_username")])
            .unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["ipmi_username"], json!("admin"));
        assert!(parsed.get("ipmi_password").is_none());

        let output = Renderer::new(false)
            .unwrap()
            .detail_with("foundation", &object, &[("IPMI Password", "ipmi_password")])
            .unwrap();
        assert!(!output.contains("hunter2"));
    }

    #[test]
    fn test_usage_percent_is_rounded() {
        let renderer = Renderer::new(false).unwrap();
        let output = renderer
            .detail("usage", &json!({"size": 3, "addresses": 1, "percent_used": 100.0 / 3.0}))
            .unwrap();
        assert!(output.contains("Used:       33.3%"), "{output}");
    }
}
