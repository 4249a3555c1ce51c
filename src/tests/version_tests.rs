#[cfg(test)]
mod tests {
    use crate::models::Permission;
    use crate::tests::{auth_header, test_services};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    #[actix_rt::test]
    async fn test_document_versioning() {
        let (_dir, services) = test_services();
        let app = init_app!(services);
        let document = services
            .documents
            .create_document("Notes", "# Test File\n\nThis is version 1.", "alice")
            .unwrap();

        // Save new content through the document endpoint
        let request = test::TestRequest::put()
            .uri(&format!("/api/documents/{}", document.id))
            .insert_header(auth_header("alice"))
            .set_json(&json!({ "content": "# Test File\n\nThis is version 2." }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        // And a manual snapshot
        let request = test::TestRequest::post()
            .uri("/api/versions/save")
            .insert_header(auth_header("alice"))
            .set_json(&json!({ "documentId": document.id, "content": "draft" }))
            .to_request();
        let saved: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(saved["editedBy"], "alice");

        let request = test::TestRequest::get()
            .uri(&format!("/api/versions/history/{}", document.id))
            .insert_header(auth_header("alice"))
            .to_request();
        let history: Value = test::call_and_read_body_json(&app, request).await;
        let contents: Vec<&str> = history
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["content"].as_str().unwrap())
            .collect();
        assert_eq!(
            contents,
            vec![
                "draft",
                "# Test File\n\nThis is version 2.",
                "# Test File\n\nThis is version 1."
            ]
        );
    }

    #[actix_rt::test]
    async fn test_revert_is_read_only_and_restore_applies() {
        let (_dir, services) = test_services();
        let app = init_app!(services);
        let document = services
            .documents
            .create_document("Notes", "v1", "alice")
            .unwrap();
        services
            .documents
            .update_document(&document.id, "v2", "alice")
            .unwrap();
        let original = services.ledger.history(&document.id).unwrap()[1].clone();

        let request = test::TestRequest::post()
            .uri(&format!("/api/versions/revert/{}", original.id))
            .insert_header(auth_header("alice"))
            .to_request();
        let reverted: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(reverted["content"], "v1");
        assert_eq!(services.ledger.history(&document.id).unwrap().len(), 2);
        assert_eq!(
            services
                .documents
                .get_document(&document.id, "alice")
                .unwrap()
                .content,
            "v2"
        );

        let request = test::TestRequest::post()
            .uri(&format!(
                "/api/documents/{}/restore/{}",
                document.id, original.id
            ))
            .insert_header(auth_header("alice"))
            .to_request();
        let restored: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(restored["document"]["content"], "v1");
        assert_eq!(restored["restoredFrom"], original.id.as_str());
        assert_eq!(services.ledger.history(&document.id).unwrap().len(), 3);
    }

    #[actix_rt::test]
    async fn test_history_requires_read_on_live_documents() {
        let (_dir, services) = test_services();
        let app = init_app!(services);
        let document = services
            .documents
            .create_document("Notes", "v1", "alice")
            .unwrap();

        let request = test::TestRequest::get()
            .uri(&format!("/api/versions/history/{}", document.id))
            .insert_header(auth_header("eve"))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let request = test::TestRequest::post()
            .uri("/api/versions/save")
            .insert_header(auth_header("eve"))
            .set_json(&json!({ "documentId": document.id, "content": "spam" }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(services.ledger.history(&document.id).unwrap().len(), 1);

        services
            .documents
            .create_share(&document.id, "eve", Permission::Read, "alice")
            .unwrap();
        let request = test::TestRequest::get()
            .uri(&format!("/api/versions/history/{}", document.id))
            .insert_header(auth_header("eve"))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_rt::test]
    async fn test_deleted_history_is_limited_to_former_editors() {
        let (_dir, services) = test_services();
        let app = init_app!(services);
        let document = services
            .documents
            .create_document("Notes", "v1", "alice")
            .unwrap();
        services
            .documents
            .create_share(&document.id, "bob", Permission::Write, "alice")
            .unwrap();
        services
            .documents
            .update_document(&document.id, "v2", "bob")
            .unwrap();
        let first = services.ledger.history(&document.id).unwrap()[1].clone();
        services
            .documents
            .delete_document(&document.id, "alice")
            .unwrap();

        let request = test::TestRequest::get()
            .uri(&format!("/api/versions/history/{}", document.id))
            .insert_header(auth_header("eve"))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let request = test::TestRequest::post()
            .uri(&format!("/api/versions/revert/{}", first.id))
            .insert_header(auth_header("eve"))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        for editor in ["alice", "bob"] {
            let request = test::TestRequest::get()
                .uri(&format!("/api/versions/history/{}", document.id))
                .insert_header(auth_header(editor))
                .to_request();
            let history: Value = test::call_and_read_body_json(&app, request).await;
            assert_eq!(history.as_array().unwrap().len(), 2);
        }

        let request = test::TestRequest::post()
            .uri(&format!("/api/versions/revert/{}", first.id))
            .insert_header(auth_header("bob"))
            .to_request();
        let reverted: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(reverted["content"], "v1");
    }

    #[actix_rt::test]
    async fn test_unknown_version_is_not_found() {
        let (_dir, services) = test_services();
        let app = init_app!(services);

        let request = test::TestRequest::post()
            .uri("/api/versions/revert/nope")
            .insert_header(auth_header("alice"))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_contributions_are_listed_for_their_author() {
        let (_dir, services) = test_services();
        let app = init_app!(services);
        let first = services
            .documents
            .create_document("One", "a", "alice")
            .unwrap();
        services
            .documents
            .create_document("Two", "b", "bob")
            .unwrap();
        services
            .documents
            .update_document(&first.id, "a2", "alice")
            .unwrap();

        let request = test::TestRequest::get()
            .uri("/api/versions/contributions/alice")
            .insert_header(auth_header("alice"))
            .to_request();
        let contributions: Value = test::call_and_read_body_json(&app, request).await;
        let contributions = contributions.as_array().unwrap();
        assert_eq!(contributions.len(), 2);
        assert!(contributions.iter().all(|v| v["editedBy"] == "alice"));

        let request = test::TestRequest::get()
            .uri("/api/versions/contributions/alice")
            .insert_header(auth_header("bob"))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
