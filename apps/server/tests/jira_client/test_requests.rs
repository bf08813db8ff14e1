//! Request shapes and response handling of `JiraClient`.

use store_qa_lib::services::check_connection;
use store_qa_lib::tracker::{IssueTracker, IssueType, JiraClient, NewIssue, RELATES_LINK, TrackerError};

use super::mock_jira::*;

fn client(mock: &MockJira) -> JiraClient {
    JiraClient::new(&mock.settings()).expect("Failed to build client")
}

#[actix_rt::test]
async fn test_search_sends_jql_and_reads_issues() {
    let mock = MockJira::start().await;
    let client = client(&mock);

    let issues = client
        .search(r#"project=SCRUM AND summary ~ "Defect for TC_001""#)
        .await
        .unwrap();

    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].key, "SCRUM-9");
    assert_eq!(issues[0].summary, "Defect for TC_001: List all products");

    let request = mock.last();
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/rest/api/2/search");
    let query = urlencoding::decode(&request.query).unwrap().into_owned();
    assert!(query.contains(r#"jql=project=SCRUM AND summary ~ "Defect for TC_001""#));
    assert!(query.contains("fields=summary"));
    assert!(query.contains("maxResults=50"));
    assert!(
        request
            .authorization
            .as_deref()
            .is_some_and(|v| v.starts_with("Basic "))
    );
}

#[actix_rt::test]
async fn test_create_sends_fields() {
    let mock = MockJira::start().await;
    let client = client(&mock);

    let issue = client
        .create(NewIssue {
            project_key: PROJECT_KEY.to_string(),
            summary: "Defect for TC_003: Get a missing product".to_string(),
            description: "**Test case**: TC_003".to_string(),
            issue_type: IssueType::Bug,
        })
        .await
        .unwrap();

    assert_eq!(issue.key, CREATED_KEY);
    assert_eq!(issue.summary, "Defect for TC_003: Get a missing product");

    let request = mock.last();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/rest/api/2/issue");
    let fields = &request.body["fields"];
    assert_eq!(fields["project"]["key"], PROJECT_KEY);
    assert_eq!(fields["summary"], "Defect for TC_003: Get a missing product");
    assert_eq!(fields["description"], "**Test case**: TC_003");
    assert_eq!(fields["issuetype"]["name"], "Bug");
}

#[actix_rt::test]
async fn test_comment_update_and_link_payloads() {
    let mock = MockJira::start().await;
    let client = client(&mock);

    client.comment("SCRUM-9", "Retest for test case TC_001").await.unwrap();
    client
        .update_description("SCRUM-9", "**Defect key**: SCRUM-9")
        .await
        .unwrap();
    client.link(RELATES_LINK, "SCRUM-42", "SCRUM-1").await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);

    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/rest/api/2/issue/SCRUM-9/comment");
    assert_eq!(requests[0].body["body"], "Retest for test case TC_001");

    assert_eq!(requests[1].method, "PUT");
    assert_eq!(requests[1].path, "/rest/api/2/issue/SCRUM-9");
    assert_eq!(requests[1].body["fields"]["description"], "**Defect key**: SCRUM-9");

    assert_eq!(requests[2].method, "POST");
    assert_eq!(requests[2].path, "/rest/api/2/issueLink");
    assert_eq!(requests[2].body["type"]["name"], RELATES_LINK);
    assert_eq!(requests[2].body["inwardIssue"]["key"], "SCRUM-42");
    assert_eq!(requests[2].body["outwardIssue"]["key"], "SCRUM-1");
}

#[actix_rt::test]
async fn test_error_status_is_reported() {
    let mock = MockJira::start().await;
    let client = client(&mock);

    match client.project("NOPE").await {
        Err(TrackerError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("No project could be found"));
        }
        other => panic!("Expected a status error, got {:?}", other.map(|p| p.key)),
    }
}

#[actix_rt::test]
async fn test_check_connection_reads_project_and_count() {
    let mock = MockJira::start().await;
    let client = client(&mock);

    let status = check_connection(&client, PROJECT_KEY).await.unwrap();

    assert_eq!(status.project_name, "Store QA");
    assert_eq!(status.issue_count, 3);
    assert!(
        mock.requests()
            .iter()
            .any(|r| r.path == "/rest/api/2/search" && r.query.contains("maxResults=0"))
    );
}
