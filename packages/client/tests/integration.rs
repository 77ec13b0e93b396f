//! Integration tests for the resource client against a mocked backend

use itms_client::{AuthContext, ClientConfigBuilder, ClientError, ItmsClient};
use itms_core::models::project::{
    Project, ProjectFilter, ProjectStatus, ProjectType, ProjectUpdateRequest,
};
use itms_core::models::project::ProjectCreateRequest;
use itms_core::{ListQuery, Page, Sort};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn client_for(server: &MockServer) -> ItmsClient {
    let config = ClientConfigBuilder::new()
        .base_url(format!("{}/api", server.uri()))
        .ephemeral()
        .build()
        .unwrap();
    ItmsClient::with_auth(config, AuthContext::in_memory()).unwrap()
}

fn project_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "code": format!("PRJ-{:03}", id),
        "name": format!("Project {}", id),
        "projectType": "SI",
        "status": status,
        "startDate": "2024-01-02",
        "companyId": 1,
        "companyName": "Acme",
        "createdAt": "2024-01-01T10:00:00",
        "createdBy": "admin",
        "updatedAt": "2024-01-01T10:00:00"
    })
}

/// Serves 25 projects with the backend's paging rules
struct PagedProjects {
    all: Vec<Value>,
}

impl Respond for PagedProjects {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let param = |name: &str| {
            request
                .url
                .query_pairs()
                .find(|(k, _)| k == name)
                .and_then(|(_, v)| v.parse::<u32>().ok())
        };
        let (page, size) = (param("page").unwrap_or(0), param("size").unwrap_or(10));
        let page = Page::from_slice(&self.all, page, size);
        ResponseTemplate::new(200).set_body_json(page)
    }
}

#[tokio::test]
async fn test_pagination_splits_25_items_into_10_10_5() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(PagedProjects {
            all: (1..=25).map(|id| project_json(id, "IN_PROGRESS")).collect(),
        })
        .mount(&server)
        .await;

    let projects = client_for(&server).projects();
    let mut sizes = Vec::new();
    for page in 0..3 {
        let result = projects
            .list(&ListQuery::new(page, 10, ProjectFilter::default()))
            .await
            .unwrap();

        assert!(result.content.len() <= result.size as usize);
        assert_eq!(result.number, page);
        assert_eq!(result.total_elements, 25);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.last, page == 2);
        sizes.push(result.content.len());
    }
    assert_eq!(sizes, vec![10, 10, 5]);
}

#[tokio::test]
async fn test_list_sends_filters_and_sort_but_not_empty_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("page", "1"))
        .and(query_param("size", "20"))
        .and(query_param("status", "COMPLETED"))
        .and(query_param("sortBy", "name"))
        .and(query_param("sortOrder", "asc"))
        .and(query_param_is_missing("name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Page::<Value>::empty(20)))
        .expect(1)
        .mount(&server)
        .await;

    let filter = ProjectFilter {
        name: Some(String::new()),
        status: Some(ProjectStatus::Completed),
        ..Default::default()
    };
    let query = ListQuery::new(1, 20, filter).with_sort(Some(Sort::asc("name")));

    let page = client_for(&server).projects().list(&query).await.unwrap();
    assert!(page.content.is_empty());
}

#[tokio::test]
async fn test_create_then_get_returns_matching_fields() {
    let server = MockServer::start().await;
    let created = project_json(26, "PREPARING");

    Mock::given(method("POST"))
        .and(path("/api/projects"))
        .and(body_json(json!({
            "code": "PRJ-026",
            "name": "Project 26",
            "projectType": "SI",
            "startDate": "2024-01-02",
            "companyId": 1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects/26"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&created))
        .mount(&server)
        .await;

    let projects = client_for(&server).projects();
    let request = ProjectCreateRequest {
        code: "PRJ-026".to_string(),
        name: "Project 26".to_string(),
        project_type: ProjectType::Si,
        start_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        end_date: None,
        company_id: Some(1),
        description: None,
        budget: None,
        pm_id: None,
    };

    let new_project: Project = projects.create(&request).await.unwrap();
    let fetched = projects.get(new_project.id).await.unwrap();

    assert_eq!(fetched, new_project);
    assert_eq!(fetched.code, request.code);
    assert_eq!(fetched.name, request.name);
    assert_eq!(fetched.project_type, request.project_type);
}

#[tokio::test]
async fn test_remove_twice_reports_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/projects/5"))
        .respond_with(ResponseTemplate::new(204))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/projects/5"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "PJ001",
            "message": "Project not found",
            "timestamp": "2024-03-01T09:00:00"
        })))
        .mount(&server)
        .await;

    let projects = client_for(&server).projects();
    projects.remove(5).await.unwrap();

    let err = projects.remove(5).await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {:?}", err);
    assert_eq!(err.user_message(), "Project not found");
}

#[tokio::test]
async fn test_get_missing_record_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).projects().get(404).await.unwrap_err();
    match err {
        ClientError::NotFound(error) => assert_eq!(error.code, itms_core::UNKNOWN_ERROR_CODE),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_update_sends_empty_object() {
    let server = MockServer::start().await;
    let stored = project_json(5, "IN_PROGRESS");
    Mock::given(method("PUT"))
        .and(path("/api/projects/5"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&stored))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client_for(&server)
        .projects()
        .update(5, &ProjectUpdateRequest::default())
        .await
        .unwrap();

    let unchanged: Project = serde_json::from_value(stored).unwrap();
    assert_eq!(updated, unchanged);
}

#[tokio::test]
async fn test_rejected_transition_leaves_status_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/projects/5/status"))
        .and(query_param("status", "COMPLETED"))
        .and(body_json(json!({ "status": "COMPLETED" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "PJ003",
            "message": "Status cannot change from PREPARING to COMPLETED"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(5, "PREPARING")))
        .mount(&server)
        .await;

    let projects = client_for(&server).projects();
    let err = projects
        .transition_status(5, ProjectStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidTransition(_)), "got {:?}", err);

    let project = projects.get(5).await.unwrap();
    assert_eq!(project.status, ProjectStatus::Preparing);
}

#[tokio::test]
async fn test_transition_sends_status_as_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/projects/5/status"))
        .and(query_param("status", "IN_PROGRESS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(5, "IN_PROGRESS")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/projects/5/status"))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "C001",
            "message": "Required request parameter 'status' is not present"
        })))
        .expect(0)
        .mount(&server)
        .await;

    let project = client_for(&server)
        .projects()
        .transition_status(5, ProjectStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(project.status, ProjectStatus::InProgress);
}

#[tokio::test]
async fn test_conflict_status_is_invalid_transition() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/srs/9/status"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .service_requests()
        .transition_status(9, itms_core::models::sr::SrStatus::Approved)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_server_error_without_body_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).projects().get(1).await.unwrap_err();
    match err {
        ClientError::Api { status, error } => {
            assert_eq!(status, 500);
            assert_eq!(error.code, itms_core::UNKNOWN_ERROR_CODE);
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_undecodable_success_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "one" })))
        .mount(&server)
        .await;

    let err = client_for(&server).projects().get(1).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_timeout_is_reported_as_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(project_json(1, "PREPARING"))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ClientConfigBuilder::new()
        .base_url(format!("{}/api", server.uri()))
        .timeout(std::time::Duration::from_millis(200))
        .ephemeral()
        .build()
        .unwrap();
    let client = ItmsClient::with_auth(config, AuthContext::in_memory()).unwrap();

    let err = client.projects().get(1).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout), "got {:?}", err);
    assert!(err.is_network_error());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let config = ClientConfigBuilder::new()
        .base_url("http://127.0.0.1:9/api")
        .ephemeral()
        .build()
        .unwrap();
    let client = ItmsClient::with_auth(config, AuthContext::in_memory()).unwrap();

    let err = client.projects().get(1).await.unwrap_err();
    assert!(err.is_network_error(), "got {:?}", err);
}
