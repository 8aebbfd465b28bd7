use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::core::{AmplitudeSnapshot, AmplitudeSource, PlaybackGate, SceneConfig};

/// Looping music element routed through an analyser to the speakers.
pub struct AudioGraph {
    pub ctx: web::AudioContext,
    pub element: web::HtmlAudioElement,
    pub analyser: web::AnalyserNode,
    gate: Rc<RefCell<PlaybackGate>>,
    _source: web::MediaElementAudioSourceNode,
}

pub fn build_audio_graph(config: &SceneConfig) -> anyhow::Result<AudioGraph> {
    let element = web::HtmlAudioElement::new_with_src(&config.audio_url)
        .map_err(|e| anyhow::anyhow!("Audio element error: {:?}", e))?;
    element.set_loop(true);
    element.set_volume(config.volume);

    let ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let source = ctx
        .create_media_element_source(&element)
        .map_err(|e| anyhow::anyhow!("MediaElementSource error: {:?}", e))?;
    let analyser =
        web::AnalyserNode::new(&ctx).map_err(|e| anyhow::anyhow!("AnalyserNode error: {:?}", e))?;
    analyser.set_fft_size(config.fft_size);

    source
        .connect_with_audio_node(&analyser)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    analyser
        .connect_with_audio_node(&ctx.destination())
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    log::info!(
        "audio graph ready: {} ({} bins)",
        config.audio_url,
        analyser.frequency_bin_count()
    );
    Ok(AudioGraph {
        ctx,
        element,
        analyser,
        gate: Rc::new(RefCell::new(PlaybackGate::new())),
        _source: source,
    })
}

impl AudioGraph {
    /// Resume the context and start playback. Must run inside a user
    /// gesture or the browser keeps the context suspended.
    ///
    /// `on_started` runs once, when playback first succeeds. A rejected
    /// attempt is logged and the next call tries again.
    pub fn unlock(&self, on_started: impl FnOnce() + 'static) {
        if !self.gate.borrow_mut().begin_attempt() {
            return;
        }
        if let Err(e) = self.ctx.resume() {
            log::warn!("AudioContext resume error: {:?}", e);
        }
        let gate = self.gate.clone();
        match self.element.play() {
            Ok(promise) => spawn_local(async move {
                let started = match JsFuture::from(promise).await {
                    Ok(_) => true,
                    Err(e) => {
                        log::warn!("audio play rejected, click again to retry: {:?}", e);
                        false
                    }
                };
                if gate.borrow_mut().finish_attempt(started) {
                    log::info!("audio playback started");
                    on_started();
                }
            }),
            Err(e) => {
                log::warn!("audio play error: {:?}", e);
                gate.borrow_mut().finish_attempt(false);
            }
        }
    }

    pub fn source(&self) -> WebAudioSource {
        WebAudioSource {
            analyser: self.analyser.clone(),
        }
    }
}

/// Reads byte frequency magnitudes straight into the snapshot buffer.
///
/// Until audio is unlocked the analyser simply reports silence.
pub struct WebAudioSource {
    analyser: web::AnalyserNode,
}

impl AmplitudeSource for WebAudioSource {
    fn fill(&mut self, snapshot: &mut AmplitudeSnapshot) {
        self.analyser.get_byte_frequency_data(snapshot.bins_mut());
    }
}
