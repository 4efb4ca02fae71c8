use casedesk::backend::{AuthProvider, CaseRepository, SupabaseClient, SupabaseConfig};
use casedesk::models::{CaseStatus, Credentials, NewCaseRequest};

fn client() -> SupabaseClient {
    dotenvy::dotenv().ok();
    let config = SupabaseConfig::new_from_env().expect("Failed to load Supabase config");
    SupabaseClient::new(config).expect("Failed to create Supabase client")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored --test-threads=1
async fn test_insert_and_fetch_case() {
    let supabase = client();

    let case_number = format!("IT-{}", chrono::Utc::now().timestamp());
    let created = supabase
        .insert_case(NewCaseRequest {
            case_number: case_number.clone(),
            client_name: "Integration Client".to_string(),
            title: "Integration v. Test".to_string(),
            status: CaseStatus::Pending,
            description: None,
            next_deadline: None,
        })
        .await
        .expect("Failed to insert case");
    assert_eq!(created.case_number, case_number);

    let cases = supabase.fetch_cases().await.expect("Failed to fetch cases");
    assert!(cases.iter().any(|c| c.id == created.id));
}

#[tokio::test]
#[ignore]
async fn test_sign_in_with_wrong_password_is_unauthorized() {
    let supabase = client();
    let result = supabase
        .sign_in(&Credentials {
            email: "nobody@example.com".to_string(),
            password: "definitely-wrong".to_string(),
        })
        .await;
    assert!(matches!(result, Err(casedesk::error::AppError::Unauthorized(_))));
}

#[tokio::test]
#[ignore]
async fn test_ping() {
    client().ping().await.expect("Supabase is reachable");
}
