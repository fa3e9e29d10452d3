//! The default SHAAD workflows the assistant can trigger.

use serde_json::json;

use super::definition::{Node, WorkflowDefinition};

pub const SEND_NOTIFICATION: &str = "SHAAD_Send_Notification";
pub const WEB_SEARCH: &str = "SHAAD_Web_Search";
pub const HOME_CONTROL: &str = "SHAAD_Home_Control";
pub const SCHEDULE_TASK: &str = "SHAAD_Schedule_Task";

/// A workflow definition together with the one-line description shown to users
#[derive(Debug, Clone)]
pub struct WorkflowTemplate {
    pub definition: WorkflowDefinition,
    pub summary: &'static str,
}

impl WorkflowTemplate {
    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

/// All default workflows, in provisioning order
pub fn default_workflows() -> Vec<WorkflowTemplate> {
    vec![
        WorkflowTemplate {
            definition: send_notification_workflow(),
            summary: "Send notifications via email, webhook, etc.",
        },
        WorkflowTemplate {
            definition: web_search_workflow(),
            summary: "Search the web for information",
        },
        WorkflowTemplate {
            definition: home_control_workflow(),
            summary: "Control smart home devices",
        },
        WorkflowTemplate {
            definition: schedule_task_workflow(),
            summary: "Schedule tasks and reminders",
        },
    ]
}

fn start_node() -> Node {
    Node::base("Start", "start", [250, 300])
}

fn code_node(name: &str, position: [i32; 2], js_code: &str) -> Node {
    Node::base(name, "code", position).with_parameters(json!({
        "mode": "runOnceForEachItem",
        "jsCode": js_code
    }))
}

fn string_equals_condition(field: &str, expected: &str) -> serde_json::Value {
    json!({
        "conditions": {
            "string": [
                {
                    "value1": format!("={{{{$json[\"{field}\"]}}}}"),
                    "operation": "equals",
                    "value2": expected
                }
            ]
        }
    })
}

/// Routes a message to email or a webhook depending on `channel`
pub fn send_notification_workflow() -> WorkflowDefinition {
    WorkflowDefinition::new(SEND_NOTIFICATION)
        .node(start_node())
        .node(
            Node::base("Route by Channel", "if", [450, 300])
                .with_parameters(string_equals_condition("channel", "email")),
        )
        .node(
            Node::base("Send Email", "emailSend", [650, 200]).with_parameters(json!({
                "resource": "message",
                "operation": "send",
                "from": "=SHAAD Assistant <noreply@shaad.local>",
                "to": "={{$json[\"recipient\"]}}",
                "subject": "={{$json[\"subject\"]}}",
                "text": "={{$json[\"message\"]}}"
            })),
        )
        .node(
            Node::base("Send to Webhook", "httpRequest", [650, 400]).with_parameters(json!({
                "url": "={{$json[\"webhook_url\"]}}",
                "requestMethod": "POST",
                "jsonParameters": true,
                "options": {},
                "bodyParametersJson": "={{JSON.stringify($json)}}"
            })),
        )
        .connect("Start", 0, "Route by Channel")
        .connect("Route by Channel", 0, "Send Email")
        .connect("Route by Channel", 1, "Send to Webhook")
}

const FORMAT_SEARCH_RESULTS: &str = r#"// Format search results
const results = $input.item.json;
const formatted = {
  query: $node["Start"].json["query"],
  results: []
};

if (results.RelatedTopics) {
  formatted.results = results.RelatedTopics.slice(0, 5).map(topic => ({
    title: topic.Text || '',
    url: topic.FirstURL || '',
    description: topic.Text || ''
  }));
}

return formatted;"#;

/// Queries DuckDuckGo and trims the answer to the top five topics
pub fn web_search_workflow() -> WorkflowDefinition {
    WorkflowDefinition::new(WEB_SEARCH)
        .node(start_node())
        .node(
            Node::base("Search DuckDuckGo", "httpRequest", [450, 300]).with_parameters(json!({
                "url": "https://api.duckduckgo.com/",
                "requestMethod": "GET",
                "queryParametersUi": {
                    "parameter": [
                        {"name": "q", "value": "={{$json[\"query\"]}}"},
                        {"name": "format", "value": "json"},
                        {"name": "no_html", "value": "1"}
                    ]
                }
            })),
        )
        .node(code_node("Format Results", [650, 300], FORMAT_SEARCH_RESULTS))
        .connect("Start", 0, "Search DuckDuckGo")
        .connect("Search DuckDuckGo", 0, "Format Results")
}

const DEVICE_REQUEST_BODY: &str = r#"={
  "action": "{{$json["action"]}}",
  "value": "{{$json["value"]}}"
}"#;

const LOG_DEVICE_ACTION: &str = r#"// Log action for future learning
const action = $input.item.json;
return {
  success: true,
  device: action.device_name,
  action: action.action,
  timestamp: new Date().toISOString()
};"#;

pub fn home_control_workflow() -> WorkflowDefinition {
    WorkflowDefinition::new(HOME_CONTROL)
        .node(start_node())
        .node(
            Node::base("Device Router", "if", [450, 300])
                .with_parameters(string_equals_condition("device_type", "light")),
        )
        .node(
            Node::base("Control Device", "httpRequest", [650, 300]).with_parameters(json!({
                "url": "={{$json[\"device_api_url\"]}}",
                "requestMethod": "POST",
                "jsonParameters": true,
                "options": {},
                "bodyParametersJson": DEVICE_REQUEST_BODY
            })),
        )
        .node(code_node("Log Action", [850, 300], LOG_DEVICE_ACTION))
        .connect("Start", 0, "Device Router")
        // Both router outputs currently hit the same device endpoint
        .connect("Device Router", 0, "Control Device")
        .connect("Device Router", 1, "Control Device")
        .connect("Control Device", 0, "Log Action")
}

const PROCESS_TASK: &str = r#"// Store task in database or schedule system
const task = $input.item.json;

// Parse the scheduled time
const scheduledTime = new Date(task.scheduled_time);
const now = new Date();

// Calculate delay in milliseconds
const delay = scheduledTime - now;

return {
  task_id: Math.random().toString(36).substr(2, 9),
  title: task.title,
  description: task.description,
  scheduled_time: scheduledTime.toISOString(),
  delay_ms: delay,
  user_id: task.user_id,
  notification_method: task.notification_method || 'email'
};"#;

const REMINDER_PARAMETERS: &str = r#"={
  "channel": "{{$json["notification_method"]}}",
  "recipient": "{{$json["user_id"]}}",
  "subject": "Reminder: {{$json["title"]}}",
  "message": "{{$json["description"]}}"
}"#;

/// Waits until the scheduled time, then hands off to the notification workflow
pub fn schedule_task_workflow() -> WorkflowDefinition {
    WorkflowDefinition::new(SCHEDULE_TASK)
        .node(start_node())
        .node(code_node("Process Task", [450, 300], PROCESS_TASK))
        .node(
            Node::base("Wait", "wait", [650, 300]).with_parameters(json!({
                "amount": "={{$json[\"delay_ms\"]}}",
                "unit": "milliseconds"
            })),
        )
        .node(
            Node::base("Send Reminder", "executeWorkflow", [850, 300]).with_parameters(json!({
                "workflowId": "={{$parameter[\"notification_workflow_id\"]}}",
                "workflowParameters": REMINDER_PARAMETERS
            })),
        )
        .connect("Start", 0, "Process Task")
        .connect("Process Task", 0, "Wait")
        .connect("Wait", 0, "Send Reminder")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_are_in_provisioning_order() {
        let names: Vec<String> = default_workflows()
            .iter()
            .map(|t| t.name().to_string())
            .collect();

        assert_eq!(
            names,
            vec![SEND_NOTIFICATION, WEB_SEARCH, HOME_CONTROL, SCHEDULE_TASK]
        );
    }

    #[test]
    fn every_template_is_active_and_fully_connected() {
        for template in default_workflows() {
            let workflow = &template.definition;
            assert!(workflow.active, "{} should be active", workflow.name);
            assert!(
                workflow.dangling_connections().is_empty(),
                "{} has dangling connections: {:?}",
                workflow.name,
                workflow.dangling_connections()
            );
            assert!(workflow.find_node("Start").is_some());
            assert!(workflow
                .nodes
                .iter()
                .all(|node| node.node_type.starts_with("n8n-nodes-base.") && node.type_version == 1));
        }
    }

    #[test]
    fn notification_router_branches_to_email_then_webhook() {
        let workflow = send_notification_workflow();
        let router = &workflow.connections["Route by Channel"].main;

        assert_eq!(router[0][0].node, "Send Email");
        assert_eq!(router[1][0].node, "Send to Webhook");
        assert_eq!(
            workflow.find_node("Route by Channel").unwrap().parameters["conditions"]["string"][0]
                ["value1"],
            "={{$json[\"channel\"]}}"
        );
    }

    #[test]
    fn home_control_router_sends_both_branches_to_device() {
        let workflow = home_control_workflow();
        let router = &workflow.connections["Device Router"].main;

        assert_eq!(router.len(), 2);
        assert!(router.iter().all(|port| port[0].node == "Control Device"));
    }

    #[test]
    fn schedule_task_waits_in_milliseconds() {
        let workflow = schedule_task_workflow();
        let wait = workflow.find_node("Wait").unwrap();

        assert_eq!(wait.node_type, "n8n-nodes-base.wait");
        assert_eq!(wait.parameters["unit"], "milliseconds");
        assert_eq!(workflow.nodes.len(), 4);
    }

    #[test]
    fn web_search_queries_duckduckgo_as_json() {
        let workflow = web_search_workflow();
        let search = workflow.find_node("Search DuckDuckGo").unwrap();
        let params = &search.parameters["queryParametersUi"]["parameter"];

        assert_eq!(search.parameters["url"], "https://api.duckduckgo.com/");
        assert_eq!(params[1]["value"], "json");
        assert!(workflow
            .find_node("Format Results")
            .unwrap()
            .parameters["jsCode"]
            .as_str()
            .unwrap()
            .contains("slice(0, 5)"));
    }
}
