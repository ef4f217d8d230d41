use nlc_stub::{
    AccessFailure, ClassifierParams, ClassifyParams, CreateClassifierParams, MemoryStore,
    NaturalLanguageClassifier, NlcConfig, NlcError,
};

const METADATA: &str = r#"{"name": "watson-diet-trainer", "language": "ja"}"#;
const GREETINGS: &str = "hello,greet\nbye,farewell\nhi,greet\nhey,greet\nsee ya,farewell";

async fn setup_nlc() -> NaturalLanguageClassifier<MemoryStore> {
    NaturalLanguageClassifier::connect(MemoryStore::new(), NlcConfig::default())
        .await
        .expect("Failed to connect to memory store")
}

async fn create_error(training_data: &str) -> NlcError {
    setup_nlc()
        .await
        .create_classifier(CreateClassifierParams::new(METADATA, training_data))
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_missing_parameters() {
    let nlc = setup_nlc().await;

    let err = nlc
        .create_classifier(CreateClassifierParams {
            training_metadata: None,
            training_data: Some(GREETINGS.into()),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Missing required parameters: training_metadata");

    let err = nlc
        .create_classifier(CreateClassifierParams {
            training_metadata: Some(METADATA.into()),
            training_data: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Missing required parameters: training_data");

    let err = nlc.classify(ClassifyParams::default()).await.unwrap_err();
    assert!(matches!(err, NlcError::MissingParameter("classifier_id")));

    let err = nlc
        .classify(ClassifyParams {
            classifier_id: Some("abcdefx123-nlc-45678".into()),
            text: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, NlcError::MissingParameter("text")));

    let err = nlc.get_classifier(ClassifierParams::default()).await.unwrap_err();
    assert!(matches!(err, NlcError::MissingParameter("classifier_id")));

    let err = nlc.delete_classifier(ClassifierParams::default()).await.unwrap_err();
    assert!(matches!(err, NlcError::MissingParameter("classifier_id")));
    assert_eq!(err.code(), 400);
}

#[tokio::test]
async fn test_missing_parameters_never_reach_the_store() {
    // A denied store would report Unauthorized if it were touched
    let nlc = NaturalLanguageClassifier::new(
        MemoryStore::new().deny(AccessFailure::InvalidKey),
        NlcConfig::default(),
    );
    let err = nlc.classify(ClassifyParams::default()).await.unwrap_err();
    assert!(matches!(err, NlcError::MissingParameter(_)));
    let err = nlc.get_classifier(ClassifierParams::default()).await.unwrap_err();
    assert!(matches!(err, NlcError::MissingParameter(_)));
}

#[tokio::test]
async fn test_missing_metadata() {
    let nlc = setup_nlc().await;
    for metadata in ["{not json", r#"{"name": "watson-diet-trainer"}"#, "\"ja\""] {
        let err = nlc
            .create_classifier(CreateClassifierParams::new(metadata, GREETINGS))
            .await
            .unwrap_err();
        assert!(matches!(err, NlcError::MissingMetadata(_)), "metadata {:?}", metadata);
        assert_eq!(err.error(), "Missing metadata");
    }
}

#[tokio::test]
async fn test_data_too_small() {
    let err = create_error("hello,greet\nbye,farewell\nhi,greet").await;
    assert!(matches!(err, NlcError::DataTooSmall { found: 3, min: 5 }));
    assert_eq!(err.code(), 400);
    assert_eq!(err.error(), "Data too small");
}

#[tokio::test]
async fn test_instance_count_boundaries() {
    let config = NlcConfig {
        max_instances: 15_000,
        ..NlcConfig::default()
    };
    let nlc = NaturalLanguageClassifier::connect(MemoryStore::new(), config)
        .await
        .unwrap();

    let lines = |n: usize| -> String {
        (0..n).map(|i| format!("phrase {},class_{}\n", i, i % 7)).collect()
    };

    let at_limit = lines(15_000);
    assert!(nlc
        .create_classifier(CreateClassifierParams::new(METADATA, at_limit))
        .await
        .is_ok());

    let over_limit = lines(15_001);
    let err = nlc
        .create_classifier(CreateClassifierParams::new(METADATA, over_limit))
        .await
        .unwrap_err();
    assert!(matches!(err, NlcError::TooManyInstances { found: 15_001, max: 15_000 }));
    assert_eq!(err.error(), "Too many data instances");
}

#[tokio::test]
async fn test_malformed_data() {
    let err = create_error("hello,greet\n,farewell\nhi,greet\nhey,greet\nsee ya,farewell").await;
    assert!(matches!(err, NlcError::MalformedData(_)));
    assert_eq!(err.error(), "Malformed data");
}

#[tokio::test]
async fn test_phrase_too_long() {
    let ok = format!(
        "{},greet\nbye,farewell\nhi,greet\nhey,greet\nsee ya,farewell",
        "x".repeat(1024)
    );
    assert!(setup_nlc()
        .await
        .create_classifier(CreateClassifierParams::new(METADATA, ok))
        .await
        .is_ok());

    let too_long = format!("hello,greet\nbye,farewell\n{},greet\nhey,greet", "x".repeat(1025));
    let err = create_error(&format!("{}\nsee ya,farewell", too_long)).await;
    assert!(matches!(err, NlcError::PhraseTooLong { line: 3, length: 1025, .. }));
    assert_eq!(err.error(), "Phrase too long");
}

#[tokio::test]
async fn test_too_many_classes() {
    let training: String = (0..3001).map(|i| format!("phrase {},class_{}\n", i, i)).collect();
    let err = create_error(&training).await;
    assert!(matches!(err, NlcError::TooManyClasses { found: 3001, max: 3000 }));
    assert_eq!(err.error(), "Too many classes");

    let training: String = (0..3000).map(|i| format!("phrase {},class_{}\n", i, i)).collect();
    assert!(setup_nlc()
        .await
        .create_classifier(CreateClassifierParams::new(METADATA, training))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_validation_errors_do_not_create_records() {
    let nlc = setup_nlc().await;
    let _ = nlc
        .create_classifier(CreateClassifierParams::new(METADATA, "hello,greet"))
        .await;
    assert!(nlc.list_classifiers().await.unwrap().result.classifiers.is_empty());
}

#[tokio::test]
async fn test_unauthorized_store() {
    let nlc = NaturalLanguageClassifier::new(
        MemoryStore::new().deny(AccessFailure::InvalidKey),
        NlcConfig::default(),
    );

    let err = nlc.list_classifiers().await.unwrap_err();
    assert!(matches!(err, NlcError::Unauthorized(_)));
    assert_eq!(err.code(), 401);
    assert_eq!(err.error(), "Not Authorized");

    let err = nlc
        .create_classifier(CreateClassifierParams::new(METADATA, GREETINGS))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 401);

    let err = nlc
        .classify(ClassifyParams::new("abcdefx123-nlc-45678", "hello"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 401);

    let err = nlc
        .get_classifier(ClassifierParams::new("abcdefx123-nlc-45678"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 401);

    let err = nlc
        .delete_classifier(ClassifierParams::new("abcdefx123-nlc-45678"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 401);
}

#[tokio::test]
async fn test_forbidden_store() {
    let err = NaturalLanguageClassifier::connect(
        MemoryStore::new().deny(AccessFailure::Rejected),
        NlcConfig::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, NlcError::Forbidden(_)));
    assert_eq!(err.code(), 403);
}

#[tokio::test]
async fn test_forbidden_on_every_operation() {
    let nlc = NaturalLanguageClassifier::new(
        MemoryStore::new().deny(AccessFailure::Rejected),
        NlcConfig::default(),
    );

    let err = nlc.list_classifiers().await.unwrap_err();
    assert!(matches!(err, NlcError::Forbidden(_)));
    assert_eq!(err.code(), 403);

    let err = nlc
        .create_classifier(CreateClassifierParams::new(METADATA, GREETINGS))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 403);

    let err = nlc
        .classify(ClassifyParams::new("abcdefx123-nlc-45678", "hello"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 403);

    let err = nlc
        .get_classifier(ClassifierParams::new("abcdefx123-nlc-45678"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 403);

    let err = nlc
        .delete_classifier(ClassifierParams::new("abcdefx123-nlc-45678"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 403);
}
