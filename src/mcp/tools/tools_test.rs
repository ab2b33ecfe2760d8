//! Tools and resources end to end: arguments in, upstream request out,
//! tool result back.

use std::collections::HashSet;

use rmcp::model::{CallToolResult, ErrorCode, RawContent, ResourceContents};
use serde_json::{Value, json};

use super::catalog;
use crate::mcp::testing::McpHarness;
use crate::twapi::testing::MockUpstream;

const V3: &str = "/projects/api/v3";

fn texts(result: &CallToolResult) -> Vec<String> {
    result
        .content
        .iter()
        .map(|content| match &content.raw {
            RawContent::Text(text) => text.text.clone(),
            other => panic!("expected text content, got {other:?}"),
        })
        .collect()
}

fn resource_text(contents: &ResourceContents) -> (String, String) {
    match contents {
        ResourceContents::TextResourceContents { uri, text, .. } => (uri.clone(), text.clone()),
        other => panic!("expected text resource, got {other:?}"),
    }
}

#[test]
fn test_catalog_registers_every_tool_once() {
    let catalog = catalog().unwrap();
    let expected = [
        "retrieve-projects",
        "retrieve-project",
        "create-project",
        "update-project",
        "delete-project",
        "retrieve-tasklists",
        "retrieve-project-tasklists",
        "retrieve-tasklist",
        "create-tasklist",
        "update-tasklist",
        "delete-tasklist",
        "retrieve-tasks",
        "retrieve-project-tasks",
        "retrieve-tasklist-tasks",
        "retrieve-task",
        "create-task",
        "update-task",
        "delete-task",
        "retrieve-milestones",
        "retrieve-project-milestones",
        "retrieve-milestone",
        "create-milestone",
        "update-milestone",
        "delete-milestone",
        "retrieve-comments",
        "retrieve-object-comments",
        "retrieve-comment",
        "create-comment",
        "update-comment",
        "delete-comment",
        "retrieve-timelogs",
        "retrieve-project-timelogs",
        "retrieve-task-timelogs",
        "retrieve-timelog",
        "create-timelog",
        "update-timelog",
        "delete-timelog",
        "retrieve-timers",
        "retrieve-timer",
        "create-timer",
        "update-timer",
        "pause-timer",
        "resume-timer",
        "complete-timer",
        "delete-timer",
        "retrieve-companies",
        "retrieve-company",
        "create-company",
        "update-company",
        "delete-company",
        "retrieve-users",
        "retrieve-project-users",
        "retrieve-user",
        "create-user",
        "update-user",
        "delete-user",
        "retrieve-teams",
        "retrieve-project-teams",
        "retrieve-team",
        "create-team",
        "update-team",
        "delete-team",
        "retrieve-tags",
        "retrieve-tag",
        "create-tag",
        "update-tag",
        "delete-tag",
        "retrieve-skills",
        "retrieve-skill",
        "create-skill",
        "update-skill",
        "delete-skill",
        "retrieve-jobroles",
        "retrieve-jobrole",
        "create-jobrole",
        "update-jobrole",
        "delete-jobrole",
        "retrieve-industries",
        "retrieve-activities",
        "retrieve-project-activities",
    ];

    let registered: HashSet<String> = catalog
        .tools()
        .list_all()
        .into_iter()
        .map(|tool| tool.name.to_string())
        .collect();
    assert_eq!(registered.len(), expected.len());
    for name in expected {
        assert!(registered.contains(name), "missing tool {name}");
    }
}

#[tokio::test]
async fn test_catalog_resources_and_templates() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let resources: Vec<String> = harness
        .resources()
        .await
        .into_iter()
        .map(|r| r.uri.clone())
        .collect();
    assert_eq!(resources.len(), 15);
    assert!(resources.contains(&"twapi://industries".to_string()));
    assert!(resources.contains(&"twapi://activities".to_string()));

    let templates: Vec<String> = harness
        .resource_templates()
        .await
        .into_iter()
        .map(|t| t.uri_template.clone())
        .collect();
    assert_eq!(templates.len(), 13);
    assert!(templates.contains(&"twapi://tasks/{id}".to_string()));
    assert!(!templates.iter().any(|t| t.starts_with("twapi://industries")));
    assert!(!templates.iter().any(|t| t.starts_with("twapi://activities")));
}

#[test]
fn test_enumerated_parameters_advertise_their_values() {
    let tools = catalog().unwrap().tools().list_all();
    let schema = |name: &str| {
        let tool = tools.iter().find(|t| t.name == name).unwrap();
        Value::Object(tool.input_schema.as_ref().clone())
    };

    assert_eq!(
        schema("create-task")["properties"]["priority"]["enum"],
        json!(["low", "medium", "high"])
    );
    assert_eq!(
        schema("create-user")["properties"]["type"]["enum"],
        json!(["account", "collaborator", "contact"])
    );
    assert_eq!(
        schema("create-comment")["properties"]["object"]["properties"]["type"]["enum"],
        json!(["tasks", "milestones", "files", "notebooks", "links"])
    );
    assert_eq!(schema("create-tag")["properties"]["name"]["maxLength"], 50);
    assert_eq!(schema("create-tag")["required"], json!(["name"]));
}

#[test]
fn test_input_schemas_carry_bounds() {
    let tools = catalog().unwrap().tools().list_all();
    let schema = |name: &str| {
        let tool = tools.iter().find(|t| t.name == name).unwrap();
        Value::Object(tool.input_schema.as_ref().clone())
    };

    let tasks = schema("retrieve-tasks");
    assert_eq!(tasks["type"], "object");
    assert_eq!(tasks["properties"]["page-size"]["minimum"], 1);
    assert!(tasks["properties"]["search-term"].is_object());

    let update = schema("update-task");
    assert_eq!(update["properties"]["progress"]["minimum"], 0);
    assert_eq!(update["properties"]["progress"]["maximum"], 100);
    assert_eq!(update["required"], json!(["task-id"]));

    let timelog = schema("create-timelog");
    assert_eq!(
        timelog["properties"]["time"]["pattern"],
        r"^\d{2}:\d{2}:\d{2}$"
    );
    let required: HashSet<&str> = timelog["required"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(required, HashSet::from(["date", "time"]));

    assert_eq!(schema("retrieve-industries")["type"], "object");
}

#[tokio::test]
async fn test_tools_listed_over_protocol_match_catalog() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let listed = harness.tools().await;
    let local = catalog().unwrap().tools().list_all();

    assert_eq!(listed.len(), 80);
    let names = |tools: &[rmcp::model::Tool]| -> Vec<String> {
        tools.iter().map(|tool| tool.name.to_string()).collect()
    };
    assert_eq!(names(&listed), names(&local));
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_retrieve_tasks_forwards_search_filters() {
    let upstream = MockUpstream::new()
        .on(
            "GET",
            &format!("{V3}/tasks.json"),
            200,
            json!({
                "tasks": [{"id": 1, "name": "a"}],
                "meta": {"page": {"pageOffset": 0, "pageSize": 10, "count": 1, "hasMore": false}}
            }),
        )
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let result = harness
        .call(
            "retrieve-tasks",
            json!({
                "search-term": "test",
                "tag-ids": [1, 2, 3],
                "match-all-tags": true,
                "page": 1,
                "page-size": 10
            }),
        )
        .await
        .unwrap();

    let request = upstream.single_request();
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, format!("{V3}/tasks.json"));
    assert_eq!(
        request.query_pairs(),
        vec![
            ("searchTerm".to_string(), "test".to_string()),
            ("tagIds".to_string(), "1,2,3".to_string()),
            ("matchAllTags".to_string(), "true".to_string()),
            ("page".to_string(), "1".to_string()),
            ("pageSize".to_string(), "10".to_string()),
        ]
    );

    let page: Value = serde_json::from_str(&texts(&result)[0]).unwrap();
    assert_eq!(page["items"][0]["id"], 1);
    assert_eq!(page["meta"]["count"], 1);
    assert_eq!(page["meta"]["hasMore"], false);
}

#[tokio::test]
async fn test_scoped_list_requires_its_scope() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness.call("retrieve-project-tasks", json!({})).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert_eq!(
        err.message,
        "invalid parameters: field \"project-id\": is required"
    );
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_create_project_confirms_and_reports_id() {
    let upstream = MockUpstream::new()
        .on("POST", "/projects.json", 201, json!({"id": "321", "STATUS": "OK"}))
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let result = harness
        .call(
            "create-project",
            json!({
                "name": "Example",
                "description": "demo",
                "start-at": "2023-01-01",
                "end-at": "2023-12-31",
                "company-id": 123,
                "owner-id": 456,
                "tag-ids": [1, 2, 3]
            }),
        )
        .await
        .unwrap();

    assert_eq!(
        texts(&result),
        vec![
            "Project created successfully".to_string(),
            json!({"id": 321}).to_string()
        ]
    );
    let body = upstream.single_request().json();
    assert_eq!(body["project"]["name"], "Example");
    assert_eq!(body["project"]["companyId"], 123);
}

#[tokio::test]
async fn test_create_project_rejects_inverted_dates() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness
        .call(
            "create-project",
            json!({"name": "Example", "start-at": "2023-12-31", "end-at": "2023-01-01"}),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("\"end-at\""));
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_retrieve_activities_filters() {
    let upstream = MockUpstream::new()
        .on(
            "GET",
            &format!("{V3}/latestactivity.json"),
            200,
            json!({"activities": []}),
        )
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    harness
        .call(
            "retrieve-activities",
            json!({
                "start-date": "2023-10-01T00:00:00Z",
                "end-date": "2023-10-31T23:59:59Z",
                "log-item-types": ["message", "task"],
                "page": 1,
                "page-size": 10
            }),
        )
        .await
        .unwrap();

    let pairs = upstream.single_request().query_pairs();
    assert!(pairs.contains(&("activityTypes".to_string(), "message,task".to_string())));
    assert!(pairs.contains(&("page".to_string(), "1".to_string())));
    assert!(pairs.contains(&("pageSize".to_string(), "10".to_string())));
    assert!(pairs.iter().any(|(k, v)| k == "startDate" && v.starts_with("2023-10-01T00:00:00")));
    assert!(pairs.iter().any(|(k, v)| k == "endDate" && v.starts_with("2023-10-31T23:59:59")));
}

#[tokio::test]
async fn test_retrieve_activities_rejects_unknown_item_type() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness
        .call(
            "retrieve-activities",
            json!({"log-item-types": ["task", "gossip"]}),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("field \"log-item-types\""));
    assert!(err.message.contains("gossip"));
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_create_comment_on_task() {
    let upstream = MockUpstream::new()
        .on("POST", "/tasks/123/comments.json", 201, json!({"commentId": "9", "STATUS": "OK"}))
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let result = harness
        .call(
            "create-comment",
            json!({"object": {"type": "tasks", "id": 123}, "body": "hi", "content-type": "TEXT"}),
        )
        .await
        .unwrap();

    assert_eq!(texts(&result)[0], "Comment created successfully");
    let request = upstream.single_request();
    assert_eq!(request.method, "POST");
    assert_eq!(
        request.json(),
        json!({"comment": {"body": "hi", "contentType": "TEXT"}})
    );
}

#[tokio::test]
async fn test_create_comment_rejects_unknown_object_type() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness
        .call(
            "create-comment",
            json!({"object": {"type": "projects", "id": 1}, "body": "hi"}),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("field \"object.type\""));
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_retrieve_object_comments_scopes_path() {
    let path = format!("{V3}/milestones/5/comments.json");
    let upstream = MockUpstream::new()
        .on("GET", &path, 200, json!({"comments": [{"id": 3, "body": "ok"}]}))
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    harness
        .call(
            "retrieve-object-comments",
            json!({"object": {"type": "milestones", "id": 5}}),
        )
        .await
        .unwrap();

    assert_eq!(upstream.single_request().path, path);
}

#[tokio::test]
async fn test_timer_verbs_confirm() {
    let upstream = MockUpstream::new()
        .on("POST", &format!("{V3}/me/timers/123/pause.json"), 200, json!({}))
        .on("POST", &format!("{V3}/me/timers/123/resume.json"), 200, json!({}))
        .on("POST", &format!("{V3}/me/timers/123/complete.json"), 200, json!({}))
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    for (tool, message) in [
        ("pause-timer", "Timer paused successfully"),
        ("resume-timer", "Timer resumed successfully"),
        ("complete-timer", "Timer completed successfully"),
    ] {
        let result = harness.call(tool, json!({"timer-id": 123})).await.unwrap();
        assert_eq!(texts(&result), vec![message.to_string()]);
    }

    let requests = upstream.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].path, format!("{V3}/me/timers/123/pause.json"));
    for request in requests {
        assert_eq!(request.method, "POST");
        assert!(request.body.is_empty());
    }
}

#[tokio::test]
async fn test_timer_verb_surfaces_upstream_message() {
    let upstream = MockUpstream::new()
        .on(
            "POST",
            &format!("{V3}/me/timers/7/complete.json"),
            400,
            json!({"errors": [{"detail": "timer has no project"}]}),
        )
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness.call("complete-timer", json!({"timer-id": 7})).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    assert_eq!(err.message, "upstream error: 400 timer has no project");
    assert_eq!(err.data, Some(json!({"status": 400})));
}

#[tokio::test]
async fn test_tag_name_length_boundary() {
    let upstream = MockUpstream::new()
        .on("POST", &format!("{V3}/tags.json"), 201, json!({"tag": {"id": 5, "name": "x"}}))
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness
        .call(
            "create-tag",
            json!({"name": "x".repeat(51)}),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert_eq!(
        err.message,
        "invalid parameters: field \"name\": must have at most 50 characters"
    );
    assert!(upstream.requests().is_empty());

    let result = harness
        .call(
            "create-tag",
            json!({"name": "x".repeat(50)}),
        )
        .await
        .unwrap();
    assert_eq!(
        texts(&result),
        vec![
            "Tag created successfully".to_string(),
            json!({"id": 5}).to_string()
        ]
    );
    assert_eq!(upstream.requests().len(), 1);
}

#[tokio::test]
async fn test_update_tag_checks_name_length() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness
        .call(
            "update-tag",
            json!({"tag-id": 1, "name": "y".repeat(51)}),
        )
        .await
        .unwrap_err();

    assert!(err.message.contains("at most 50 characters"));
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_create_timelog_needs_exactly_one_target() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;
    let base = json!({"date": "2024-03-01", "time": "09:00:00", "hours": 1});

    let mut both = base.clone();
    both["project-id"] = json!(1);
    both["task-id"] = json!(2);
    let err = harness.call("create-timelog", both).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("field \"task-id\""));

    let err = harness.call("create-timelog", base).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("field \"project-id\""));

    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_create_timelog_rejects_zero_duration() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness
        .call(
            "create-timelog",
            json!({"task-id": 2, "date": "2024-03-01", "time": "09:00:00"}),
        )
        .await
        .unwrap_err();

    assert!(err.message.contains("hours and minutes cannot both be zero"));
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_create_timelog_on_task() {
    let path = format!("{V3}/tasks/2/time.json");
    let upstream = MockUpstream::new()
        .on("POST", &path, 201, json!({"timelog": {"id": 77}}))
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let result = harness
        .call(
            "create-timelog",
            json!({
                "task-id": 2,
                "date": "2024-03-01",
                "time": "09:30:00",
                "minutes": 45,
                "is-billable": true
            }),
        )
        .await
        .unwrap();

    assert_eq!(texts(&result)[1], json!({"id": 77}).to_string());
    let request = upstream.single_request();
    assert_eq!(request.path, path);
    let body = request.json();
    assert_eq!(body["timelog"]["time"], "09:30:00");
    assert_eq!(body["timelog"]["date"], "2024-03-01");
    assert_eq!(body["timelog"]["minutes"], 45);
    assert_eq!(body["timelog"]["hours"], 0);
    assert_eq!(body["timelog"]["isBillable"], true);
}

#[tokio::test]
async fn test_enumerations_rejected_at_bind_time() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness
        .call(
            "create-task",
            json!({"tasklist-id": 1, "name": "t", "priority": "urgent"}),
        )
        .await
        .unwrap_err();
    assert!(err.message.contains("field \"priority\": must be one of [low, medium, high]"));

    let err = harness
        .call(
            "create-user",
            json!({"first-name": "A", "last-name": "B", "email": "a@b.c", "type": "owner"}),
        )
        .await
        .unwrap_err();
    assert!(err.message.contains("field \"type\""));

    let err = harness
        .call(
            "update-comment",
            json!({"comment-id": 1, "content-type": "MARKDOWN"}),
        )
        .await
        .unwrap_err();
    assert!(err.message.contains("field \"content-type\""));

    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_every_invalid_field_is_reported() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness
        .call(
            "create-task",
            json!({"name": 5, "progress": "half"}),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.message,
        "invalid parameters: field \"tasklist-id\": is required; \
         field \"name\": expected string, got number; \
         field \"progress\": expected number, got string"
    );
}

#[tokio::test]
async fn test_task_progress_outside_percentage_rejected() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    for progress in [101, 300, -1] {
        for tool in ["create-task", "update-task"] {
            let err = harness
                .call(
                    tool,
                    json!({"task-id": 1, "tasklist-id": 1, "name": "t", "progress": progress}),
                )
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
            assert_eq!(
                err.message,
                "invalid parameters: field \"progress\": must be between 0 and 100"
            );
        }
    }
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_task_progress_bounds_accepted() {
    let path = format!("{V3}/tasks/1.json");
    let upstream = MockUpstream::new()
        .on("PATCH", &path, 200, json!({"task": {"id": 1}}))
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    for progress in [0, 100] {
        harness
            .call("update-task", json!({"task-id": 1, "progress": progress}))
            .await
            .unwrap();
    }

    let requests = upstream.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].json()["task"]["progress"], 0);
    assert_eq!(requests[1].json()["task"]["progress"], 100);
}

#[tokio::test]
async fn test_update_task_sends_only_given_fields() {
    let path = format!("{V3}/tasks/9.json");
    let upstream = MockUpstream::new()
        .on("PATCH", &path, 200, json!({"task": {"id": 9, "name": "t"}}))
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let result = harness
        .call(
            "update-task",
            json!({
                "task-id": 9,
                "description": "",
                "tag-ids": [],
                "assignees": {"user-ids": [4]}
            }),
        )
        .await
        .unwrap();

    assert_eq!(texts(&result), vec!["Task updated successfully".to_string()]);
    let body = upstream.single_request().json();
    let task = body["task"].as_object().unwrap();
    let mut keys: Vec<&str> = task.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["assignees", "description", "tagIds"]);
    assert_eq!(task["description"], "");
    assert_eq!(task["tagIds"], json!([]));
}

#[tokio::test]
async fn test_milestone_assignees_use_legacy_encoding() {
    let upstream = MockUpstream::new()
        .on("POST", "/projects/3/milestones.json", 201, json!({"milestoneId": "11"}))
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    harness
        .call(
            "create-milestone",
            json!({
                "project-id": 3,
                "name": "Launch",
                "deadline": "2024-06-30",
                "assignees": {"user-ids": [1, 2], "company-ids": [3], "team-ids": [4]}
            }),
        )
        .await
        .unwrap();

    let body = upstream.single_request().json();
    assert_eq!(body["milestone"]["responsible-party-ids"], "1,2,c3,t4");
}

#[tokio::test]
async fn test_retrieve_single_and_not_found() {
    let upstream = MockUpstream::new()
        .on(
            "GET",
            &format!("{V3}/companies/8.json"),
            200,
            json!({"company": {"id": 8, "name": "Acme"}}),
        )
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let result = harness.call("retrieve-company", json!({"company-id": 8})).await.unwrap();
    let company: Value = serde_json::from_str(&texts(&result)[0]).unwrap();
    assert_eq!(company["id"], 8);
    assert_eq!(company["name"], "Acme");

    let err = harness.call("retrieve-company", json!({"company-id": 9})).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
}

#[tokio::test]
async fn test_delete_confirms() {
    let upstream = MockUpstream::new()
        .on_raw("DELETE", &format!("{V3}/skills/4.json"), 204, None, "")
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let result = harness.call("delete-skill", json!({"skill-id": 4})).await.unwrap();

    assert_eq!(texts(&result), vec!["Skill deleted successfully".to_string()]);
    assert_eq!(upstream.single_request().method, "DELETE");
}

#[tokio::test]
async fn test_team_legacy_ids_sent_as_numbers() {
    let upstream = MockUpstream::new()
        .on("POST", "/teams.json", 201, json!({"id": "12", "STATUS": "OK"}))
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let result = harness
        .call(
            "create-team",
            json!({"name": "Core", "parent-team-id": 2, "user-ids": [5, 6]}),
        )
        .await
        .unwrap();

    assert_eq!(texts(&result)[1], json!({"id": 12}).to_string());
    let body = upstream.single_request().json();
    assert_eq!(body["team"]["name"], "Core");
    assert_eq!(body["team"]["parentTeamId"], 2);
    assert_eq!(body["team"]["userIds"], "5,6");
}

#[tokio::test]
async fn test_list_resource_exposes_items_by_uri() {
    let upstream = MockUpstream::new()
        .on(
            "GET",
            &format!("{V3}/tasks.json"),
            200,
            json!({"tasks": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]}),
        )
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let contents = harness.read("twapi://tasks").await.unwrap();

    let uris: Vec<String> = contents.iter().map(|c| resource_text(c).0).collect();
    assert_eq!(uris, vec!["twapi://tasks/1", "twapi://tasks/2"]);
    let first: Value = serde_json::from_str(&resource_text(&contents[0]).1).unwrap();
    assert_eq!(first["name"], "a");
}

#[tokio::test]
async fn test_template_read_round_trips_uri() {
    let upstream = MockUpstream::new()
        .on(
            "GET",
            &format!("{V3}/jobroles/7.json"),
            200,
            json!({"jobRole": {"id": 7, "name": "Designer"}}),
        )
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let uri = "twapi://jobroles/7";
    let contents = harness.read(uri).await.unwrap();

    assert_eq!(contents.len(), 1);
    let (read_uri, text) = resource_text(&contents[0]);
    assert_eq!(read_uri, uri);
    let role: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(role["id"], 7);
    assert_eq!(upstream.single_request().path, format!("{V3}/jobroles/7.json"));
}

#[tokio::test]
async fn test_unknown_resource_uri() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    for uri in ["twapi://widgets/1", "twapi://industries/1"] {
        let err = harness.read(uri).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert_eq!(err.data, Some(json!({"uri": uri})));
    }
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_list_pages_respect_page_size() {
    let path = format!("{V3}/projects.json");
    let mut offsets = Vec::new();

    for page in [1u32, 2] {
        let upstream = MockUpstream::new()
            .on(
                "GET",
                &path,
                200,
                json!({
                    "projects": [
                        {"id": page * 10 + 1, "name": "a"},
                        {"id": page * 10 + 2, "name": "b"}
                    ],
                    "meta": {"page": {
                        "pageOffset": page - 1,
                        "pageSize": 2,
                        "count": 4,
                        "hasMore": page < 2
                    }}
                }),
            )
            .start()
            .await;
        let harness = McpHarness::start(upstream.engine()).await;

        let result = harness
            .call("retrieve-projects", json!({"page": page, "page-size": 2}))
            .await
            .unwrap();

        let pairs = upstream.single_request().query_pairs();
        assert!(pairs.contains(&("page".to_string(), page.to_string())));
        assert!(pairs.contains(&("pageSize".to_string(), "2".to_string())));

        let listed: Value = serde_json::from_str(&texts(&result)[0]).unwrap();
        let items = listed["items"].as_array().unwrap();
        assert!(items.len() <= 2, "page {page} returned {} items", items.len());
        assert_eq!(listed["meta"]["pageSize"], 2);
        assert_eq!(listed["meta"]["hasMore"], page < 2);
        offsets.push(listed["meta"]["pageOffset"].as_u64().unwrap());
    }

    assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]), "offsets {offsets:?}");
}

#[tokio::test]
async fn test_page_size_must_be_positive() {
    let upstream = MockUpstream::new().start().await;
    let harness = McpHarness::start(upstream.engine()).await;

    let err = harness
        .call("retrieve-projects", json!({"page-size": 0}))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("field \"page-size\""));
    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn test_update_project_clears_tags_with_empty_list() {
    let upstream = MockUpstream::new()
        .on("PUT", "/projects/5.json", 200, json!({"STATUS": "OK"}))
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let result = harness
        .call("update-project", json!({"project-id": 5, "tag-ids": []}))
        .await
        .unwrap();
    harness
        .call("update-project", json!({"project-id": 5, "name": "Renamed"}))
        .await
        .unwrap();

    assert_eq!(texts(&result), vec!["Project updated successfully".to_string()]);
    let requests = upstream.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].json(), json!({"project": {"tagIds": ""}}));
    let renamed = requests[1].json();
    assert_eq!(renamed["project"]["name"], "Renamed");
    assert!(renamed["project"].get("tagIds").is_none());
}

#[tokio::test]
async fn test_update_milestone_clears_lists_with_empty_list() {
    let upstream = MockUpstream::new()
        .on("PUT", "/milestones/8.json", 200, json!({"STATUS": "OK"}))
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    harness
        .call(
            "update-milestone",
            json!({"milestone-id": 8, "tag-ids": [], "tasklist-ids": []}),
        )
        .await
        .unwrap();
    harness
        .call("update-milestone", json!({"milestone-id": 8, "tag-ids": [4, 5]}))
        .await
        .unwrap();

    let requests = upstream.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].json(),
        json!({"milestone": {"tagIds": "", "tasklistIds": ""}})
    );
    let tagged = requests[1].json();
    assert_eq!(tagged["milestone"]["tagIds"], "4,5");
    assert!(tagged["milestone"].get("tasklistIds").is_none());
}

#[tokio::test]
async fn test_create_reports_id_beside_other_objects() {
    let upstream = MockUpstream::new()
        .on(
            "POST",
            &format!("{V3}/tasklists/3/tasks.json"),
            201,
            json!({"affected": {"taskIds": [8]}, "task": {"id": 8, "name": "t"}}),
        )
        .start()
        .await;
    let harness = McpHarness::start(upstream.engine()).await;

    let result = harness
        .call("create-task", json!({"tasklist-id": 3, "name": "t"}))
        .await
        .unwrap();

    assert_eq!(
        texts(&result),
        vec![
            "Task created successfully".to_string(),
            json!({"id": 8}).to_string()
        ]
    );
}
