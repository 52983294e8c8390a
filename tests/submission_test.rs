use std::io::Cursor;
use std::sync::Mutex;

use gemini_explorer::{
    Blob, Config, Content, ContentGenerator, Error, Explorer, Mode, Outcome, Part, Rejection,
    UploadedImage, session,
    session::{Session, Step},
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Records every call and answers with a fixed reply.
struct Recorder {
    reply: String,
    calls: Mutex<Vec<(String, Content)>>,
}

impl Recorder {
    fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Content)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ContentGenerator for Recorder {
    async fn generate_content(&self, model: &str, content: Content) -> gemini_explorer::Result<String> {
        self.calls.lock().unwrap().push((model.to_string(), content));
        Ok(self.reply.clone())
    }
}

struct Failing;

impl ContentGenerator for Failing {
    async fn generate_content(&self, _model: &str, _content: Content) -> gemini_explorer::Result<String> {
        Err(Error::Api {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            message: "Resource has been exhausted".to_string(),
        })
    }
}

fn png_upload() -> UploadedImage {
    let img = RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 30) as u8, (y * 30) as u8, 200]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    UploadedImage::from_bytes("chart.png", &buf.into_inner()).unwrap()
}

fn config() -> Config {
    Config {
        api_key: "test-key".to_string(),
        ..Config::default()
    }
}

#[tokio::test]
async fn vision_without_image_is_rejected_without_calling_service() {
    let recorder = Recorder::replying("unused");
    let explorer = Explorer::new(&recorder, &config());

    let outcome = explorer.submit_vision("what is this?", None).await.unwrap();

    assert_eq!(outcome, Outcome::Rejected(Rejection::MissingImage));
    assert_eq!(outcome_message(&outcome), "Please upload an image");
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn vision_with_empty_prompt_reports_missing_image() {
    let recorder = Recorder::replying("unused");
    let explorer = Explorer::new(&recorder, &config());
    let image = png_upload();

    let outcome = explorer.submit_vision("", Some(&image)).await.unwrap();

    assert_eq!(outcome, Outcome::Rejected(Rejection::EmptyPrompt));
    assert_eq!(outcome_message(&outcome), "Please upload an image");
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn vision_sends_prompt_then_jpeg_tagged_image() {
    let recorder = Recorder::replying("A bar chart with *three* bars.");
    let explorer = Explorer::new(&recorder, &config());
    let image = png_upload();

    let outcome = explorer
        .submit_vision("Describe the chart", Some(&image))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Response("A bar chart with *three* bars.".to_string())
    );

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    let (model, content) = &calls[0];
    assert_eq!(model, "gemini-pro-vision");
    assert_eq!(
        content.parts,
        vec![
            Part::text("Describe the chart"),
            Part::inline(Blob {
                mime_type: "image/jpeg".to_string(),
                data: image.to_bytes().unwrap(),
            }),
        ]
    );
}

#[tokio::test]
async fn text_sends_literal_prompt_even_when_empty() {
    let recorder = Recorder::replying("  verbatim\n");
    let explorer = Explorer::new(&recorder, &config());

    assert_eq!(explorer.submit_text("").await.unwrap(), "  verbatim\n");
    assert_eq!(explorer.submit_text("Hola").await.unwrap(), "  verbatim\n");

    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "gemini-pro");
    assert_eq!(calls[0].1, Content::text(""));
    assert_eq!(calls[1].1, Content::text("Hola"));
}

#[tokio::test]
async fn text_mode_ignores_attached_image() {
    let recorder = Recorder::replying("ok");
    let explorer = Explorer::new(&recorder, &config());
    let image = png_upload();

    let outcome = explorer.submit(Mode::Text, "hi", Some(&image)).await.unwrap();

    assert_eq!(outcome, Outcome::Response("ok".to_string()));
    assert_eq!(recorder.calls()[0].1, Content::text("hi"));
}

#[tokio::test]
async fn configured_models_are_used() {
    let config = Config {
        text_model: "gemini-1.5-flash".to_string(),
        vision_model: "gemini-1.5-pro".to_string(),
        ..Config::default()
    };
    let recorder = Recorder::replying("ok");
    let explorer = Explorer::new(&recorder, &config);
    let image = png_upload();

    explorer.submit_text("a").await.unwrap();
    explorer.submit_vision("b", Some(&image)).await.unwrap();

    let models: Vec<String> = recorder.calls().into_iter().map(|c| c.0).collect();
    assert_eq!(models, ["gemini-1.5-flash", "gemini-1.5-pro"]);
}

#[tokio::test]
async fn service_errors_propagate() {
    let explorer = Explorer::new(Failing, &Config::default());

    let err = explorer.submit_text("hi").await.unwrap_err();
    assert!(matches!(err, Error::Api { status, .. } if status.as_u16() == 429));

    let image = png_upload();
    let err = explorer.submit_vision("hi", Some(&image)).await.unwrap_err();
    assert!(err.to_string().contains("Resource has been exhausted"));
}

#[tokio::test]
async fn session_switches_modes_and_reports_inline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chart.png");
    std::fs::write(&path, {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(2, 2))
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    })
    .unwrap();

    let script = format!(
        "hello\n/vision\nwhat is it?\n/image {}\n\nwhat is it?\n/image notes.txt\n/quit\nnever sent\n",
        path.display()
    );
    let recorder = Recorder::replying("model says hi");
    let explorer = Explorer::new(&recorder, &config());
    let mut output = Vec::new();

    session::run(&explorer, script.as_bytes(), &mut output).await.unwrap();

    let output = String::from_utf8(output).unwrap();
    assert_eq!(output.matches("model says hi").count(), 2);
    assert_eq!(output.matches("error: Please upload an image").count(), 2);
    assert!(output.contains("mode: Gemini Pro Vision"));
    assert!(output.contains("image: chart.png (Png, 2x2)"));
    assert!(output.contains("error: unsupported file type"));

    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "gemini-pro");
    assert_eq!(calls[1].0, "gemini-pro-vision");
    assert_eq!(calls[1].1.parts.len(), 2);
}

#[tokio::test]
async fn session_keeps_going_after_service_failure() {
    let explorer = Explorer::new(Failing, &Config::default());
    let mut output = Vec::new();

    session::run(&explorer, &b"first\nsecond\n"[..], &mut output)
        .await
        .unwrap();

    let output = String::from_utf8(output).unwrap();
    assert_eq!(output.matches("Resource has been exhausted").count(), 2);
}

#[tokio::test]
async fn clearing_the_image_brings_back_the_rejection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.jpg");
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(3, 3))
        .write_to(&mut buf, ImageFormat::Jpeg)
        .unwrap();
    std::fs::write(&path, buf.into_inner()).unwrap();

    let recorder = Recorder::replying("a dark square");
    let explorer = Explorer::new(&recorder, &config());
    let mut session = Session::default();

    assert_eq!(session.prompt(), "[Gemini Pro]> ");
    session.handle(&explorer, "/vision").await;
    assert_eq!(session.prompt(), "[Gemini Pro Vision]> ");

    let attached = session
        .handle(&explorer, &format!("/image {}", path.display()))
        .await;
    assert_eq!(attached, Step::Reply("image: photo.jpg (Jpeg, 3x3)\n".to_string()));
    assert_eq!(
        session.handle(&explorer, "what is this?").await,
        Step::Reply("a dark square\n".to_string())
    );

    session.handle(&explorer, "/clear").await;
    assert_eq!(
        session.handle(&explorer, "what is this?").await,
        Step::Reply("error: Please upload an image\n".to_string())
    );
    assert_eq!(session.handle(&explorer, "/quit").await, Step::Quit);
    assert_eq!(recorder.calls().len(), 1);
}

fn outcome_message(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Rejected(r) => r.to_string(),
        Outcome::Response(text) => text.clone(),
    }
}
