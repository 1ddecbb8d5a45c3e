use clipnest_preview::OcrEngine;
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;

use crate::{
    event::{CapturedImage, Event},
    Error,
};

/// Runs text recognition on captured images away from the control loop and
/// hands the result over as [`Event::ImageCaptured`].
pub struct OcrWorker {
    engine: Option<OcrEngine>,

    image_receiver: mpsc::UnboundedReceiver<CapturedImage>,

    event_sender: mpsc::UnboundedSender<Event>,
}

impl OcrWorker {
    pub const fn new(
        engine: Option<OcrEngine>,
        image_receiver: mpsc::UnboundedReceiver<CapturedImage>,
        event_sender: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self { engine, image_receiver, event_sender }
    }

    async fn recognize(&self, CapturedImage { png, captured_at }: CapturedImage) -> Event {
        let ocr_text = match &self.engine {
            Some(engine) => engine.extract_text(&png).await,
            None => String::new(),
        };
        Event::ImageCaptured { png, ocr_text, captured_at }
    }

    /// # Errors
    /// Returns an error if the control loop is gone.
    #[allow(clippy::redundant_pub_crate)]
    pub async fn serve(mut self, shutdown_signal: sigfinn::Shutdown) -> Result<(), Error> {
        let mut shutdown_signal = shutdown_signal.into_stream();
        if let Some(engine) = &self.engine {
            tracing::info!("Recognize text in images with `{}`", engine.program());
        }

        loop {
            let image = tokio::select! {
                image = self.image_receiver.recv() => image,
                _ = shutdown_signal.next() => return Ok(()),
            };
            let Some(image) = image else {
                return Ok(());
            };

            let event = self.recognize(image).await;
            self.event_sender.send(event).map_err(|_| Error::EventChannelClosed)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use clipnest_preview::OcrEngine;
    use time::OffsetDateTime;
    use tokio::sync::mpsc;

    use super::OcrWorker;
    use crate::event::{CapturedImage, Event};

    #[tokio::test]
    async fn test_recognize() {
        let (_image_sender, image_receiver) = mpsc::unbounded_channel();
        let (event_sender, _event_receiver) = mpsc::unbounded_channel();
        let image =
            CapturedImage { png: vec![1, 2, 3].into(), captured_at: OffsetDateTime::UNIX_EPOCH };

        let worker = OcrWorker::new(None, image_receiver, event_sender.clone());
        assert_eq!(
            worker.recognize(image.clone()).await,
            Event::ImageCaptured {
                png: image.png.clone(),
                ocr_text: String::new(),
                captured_at: image.captured_at
            }
        );

        let (_image_sender, image_receiver) = mpsc::unbounded_channel();
        let engine = OcrEngine::new("clipnest-no-such-ocr-program", None::<String>);
        let worker = OcrWorker::new(Some(engine), image_receiver, event_sender);
        let Event::ImageCaptured { ocr_text, .. } = worker.recognize(image).await else {
            panic!("image event is expected");
        };
        assert!(ocr_text.is_empty());
    }
}
