//! End-to-end submission tests: gate → dispatcher → mock bucket → decoder.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use http::StatusCode;

    use formpost_core::{SubmissionGate, SubmitOutcome};
    use formpost_http::{Progress, UploadDispatcher};
    use formpost_model::{
        FileControl, Form, FormField, SYNTHETIC_VALUE_MARKER, Submitter, UploadFile, UploadPolicy,
    };

    use crate::init_tracing;
    use crate::mock::{MockBucket, MockResponse, ReceivedUpload};

    fn form_with_control(url: &str, name: &str, files: Vec<UploadFile>) -> Form {
        let policy = UploadPolicy::new()
            .with_field("key", "tmp/${filename}")
            .with_field("policy", "eyJjb25kaXRpb25zIjpbXX0=")
            .with_field("x-amz-signature", "deadbeef");
        let mut control = FileControl::new(name, url, policy);
        control.set_files(files);

        let mut form = Form::new();
        form.push_field("title", "hello");
        form.push_control(control);
        form
    }

    #[tokio::test]
    async fn test_should_thread_decoded_key_into_hidden_field() {
        init_tracing();
        let bucket = MockBucket::start(Arc::new(|_: &ReceivedUpload| {
            MockResponse::created("tmp/x%20y.jpg")
        }))
        .await;

        let mut form = form_with_control(
            &bucket.url(),
            "attachment",
            vec![UploadFile::new("x y.jpg", &b"jpeg-bytes"[..]).with_content_type(mime::IMAGE_JPEG)],
        );

        let mut gate = SubmissionGate::new();
        let submitter = Submitter::new("save", "Save");
        let outcome = gate
            .submit(&mut form, Some(&submitter), &UploadDispatcher::new())
            .await
            .expect("submit");

        let SubmitOutcome::Released(fields) = outcome else {
            panic!("expected release, got {outcome:?}");
        };
        assert_eq!(
            fields,
            vec![
                FormField::new("title", "hello"),
                FormField::new("attachment", "tmp/x y.jpg"),
                FormField::new(SYNTHETIC_VALUE_MARKER, "attachment"),
                FormField::new("save", "Save"),
            ]
        );

        // The wire carried the policy fields verbatim plus the ambient ones.
        let received = bucket.received();
        assert_eq!(received.len(), 1);
        let upload = &received[0];
        assert_eq!(upload.field("policy"), Some("eyJjb25kaXRpb25zIjpbXX0="));
        assert_eq!(upload.field("x-amz-signature"), Some("deadbeef"));
        assert_eq!(upload.field("success_action_status"), Some("201"));
        assert_eq!(upload.field("Content-Type"), Some("image/jpeg"));
        assert_eq!(upload.filename.as_deref(), Some("x y.jpg"));
        assert_eq!(upload.file_len, b"jpeg-bytes".len());
    }

    #[tokio::test]
    async fn test_should_block_submission_on_http_error() {
        init_tracing();
        let bucket = MockBucket::start(Arc::new(|_: &ReceivedUpload| {
            MockResponse::rejected(StatusCode::BAD_REQUEST)
        }))
        .await;

        let mut form = form_with_control(
            &bucket.url(),
            "attachment",
            vec![UploadFile::new("a.txt", &b"data"[..])],
        );

        let mut gate = SubmissionGate::new();
        let outcome = gate
            .submit(&mut form, None, &UploadDispatcher::new())
            .await
            .expect("submit");

        assert_eq!(
            outcome,
            SubmitOutcome::Blocked {
                invalid_controls: vec!["attachment".to_owned()],
            }
        );
        let control = &form.controls()[0];
        assert_eq!(control.validity().custom_message(), Some("Bad Request"));
        assert!(control.validity().was_reported());
        assert!(form.hidden_fields().is_empty());
    }

    #[tokio::test]
    async fn test_should_block_submission_on_network_error() {
        init_tracing();
        // Nothing listens here.
        let mut form = form_with_control(
            "http://127.0.0.1:9/",
            "attachment",
            vec![UploadFile::new("a.txt", &b"data"[..])],
        );

        let mut gate = SubmissionGate::new();
        let outcome = gate
            .submit(&mut form, None, &UploadDispatcher::new())
            .await
            .expect("submit");

        assert!(matches!(outcome, SubmitOutcome::Blocked { .. }));
        let message = form.controls()[0]
            .validity()
            .custom_message()
            .expect("validation message")
            .to_owned();
        assert!(!message.is_empty());
    }

    #[tokio::test]
    async fn test_should_wait_for_every_file_regardless_of_order() {
        init_tracing();
        let bucket = MockBucket::start(Arc::new(|upload: &ReceivedUpload| {
            let filename = upload.filename.clone().unwrap_or_default();
            let escaped = crate::mock::escape_key(&format!("tmp/{filename}"));
            let answer = MockResponse::created(&escaped);
            if filename == "first.bin" {
                // The first file answers last.
                answer.after(Duration::from_millis(80))
            } else {
                answer
            }
        }))
        .await;

        let mut form = form_with_control(
            &bucket.url(),
            "attachment",
            vec![
                UploadFile::new("first.bin", &b"1"[..]),
                UploadFile::new("second.bin", &b"2"[..]),
            ],
        );

        let mut gate = SubmissionGate::new();
        let outcome = gate
            .submit(&mut form, None, &UploadDispatcher::new())
            .await
            .expect("submit");

        let SubmitOutcome::Released(fields) = outcome else {
            panic!("expected release");
        };
        let values: Vec<&str> = fields
            .iter()
            .filter(|f| f.name == "attachment")
            .map(|f| f.value.as_str())
            .collect();
        // Both settled before release; key order follows file order.
        assert_eq!(values, ["tmp/first.bin", "tmp/second.bin"]);
        assert_eq!(bucket.received().len(), 2);
    }

    #[tokio::test]
    async fn test_should_skip_control_without_files() {
        init_tracing();
        let bucket = MockBucket::accepting("tmp").await;

        let mut form = Form::new();
        form.push_field("title", "hello");
        form.push_control(FileControl::new(
            "attachment",
            bucket.url(),
            UploadPolicy::new(),
        ));

        let mut gate = SubmissionGate::new();
        let outcome = gate
            .submit(&mut form, None, &UploadDispatcher::new())
            .await
            .expect("submit");

        let SubmitOutcome::Released(fields) = outcome else {
            panic!("expected release");
        };
        assert_eq!(fields, vec![FormField::new("title", "hello")]);
        assert!(bucket.received().is_empty());
    }

    #[tokio::test]
    async fn test_should_report_upload_progress() {
        init_tracing();
        let bucket = MockBucket::accepting("tmp").await;

        let snapshots: Arc<Mutex<Vec<Progress>>> = Arc::default();
        let sink = Arc::clone(&snapshots);
        let dispatcher = UploadDispatcher::new()
            .with_progress_observer(Arc::new(move |p| sink.lock().expect("lock").push(p)));

        let mut form = form_with_control(
            &bucket.url(),
            "attachment",
            vec![UploadFile::new("big.bin", vec![7u8; 150 * 1024])],
        );

        let mut gate = SubmissionGate::new();
        let outcome = gate
            .submit(&mut form, None, &dispatcher)
            .await
            .expect("submit");
        assert!(matches!(outcome, SubmitOutcome::Released(_)));

        let snapshots = snapshots.lock().expect("lock");
        let last = snapshots.last().expect("at least one snapshot");
        assert_eq!(last.sent, last.total);
        assert!(last.total > 150 * 1024);
        // Progress advanced monotonically across chunks.
        assert!(snapshots.windows(2).all(|w| w[0].sent <= w[1].sent));
        assert!(snapshots.len() > 2);
    }

    #[tokio::test]
    async fn test_should_keep_sibling_controls_independent() {
        init_tracing();
        let bucket = MockBucket::start(Arc::new(|upload: &ReceivedUpload| {
            if upload.filename.as_deref() == Some("bad.bin") {
                MockResponse::rejected(StatusCode::FORBIDDEN)
            } else {
                MockResponse::created("tmp/good.bin")
            }
        }))
        .await;

        let mut form = Form::new();
        let mut good = FileControl::new("good", bucket.url(), UploadPolicy::new());
        good.set_files(vec![UploadFile::new("good.bin", &b"ok"[..])]);
        let mut bad = FileControl::new("bad", bucket.url(), UploadPolicy::new());
        bad.set_files(vec![UploadFile::new("bad.bin", &b"no"[..])]);
        form.push_control(good);
        form.push_control(bad);

        let mut gate = SubmissionGate::new();
        let outcome = gate
            .submit(&mut form, None, &UploadDispatcher::new())
            .await
            .expect("submit");

        assert_eq!(
            outcome,
            SubmitOutcome::Blocked {
                invalid_controls: vec!["bad".to_owned()],
            }
        );
        // The sibling settled and kept its key even though the form is blocked.
        assert_eq!(form.controls()[0].keys().len(), 1);
        assert_eq!(
            form.controls()[1].validity().custom_message(),
            Some("Forbidden")
        );
        // Both uploads were attempted; the failure did not cancel the sibling.
        assert_eq!(bucket.received().len(), 2);
    }
}
