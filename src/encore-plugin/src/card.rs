//! Rich music card rendering.
//!
//! The chat client renders a playable song card from an app message whose
//! payload is the XML fragment produced here. Two client app identities are
//! supported and selected by [`CardVariant`]; they differ in the tag set the
//! client expects and in the trailing `appinfo` block.
//!
//! Every interpolated field is XML-escaped, so titles like `Rock & Roll`
//! cannot corrupt the payload. Stream URLs are sent without their query
//! string; the signed query parameters expire quickly and the client refuses
//! cards whose media URL carries them.

use quick_xml::escape::escape;

use encore_catalog::TrackDetail;
use encore_settings::CardVariant;

/// App message type the host must send music cards with.
pub const MUSIC_APP_MESSAGE_TYPE: i32 = 3;

const STANDARD_APP_ID: &str = "wx79f2c4418704b4f8";
const SHAKE_APP_ID: &str = "wx485a97c844086dc9";
const SHAKE_APP_NAME: &str = "摇一摇搜歌";

/// Everything needed to render a playable song card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicCard {
    /// Song title.
    pub title: String,
    /// Performing artist.
    pub singer: String,
    /// Web page for the song.
    pub page_url: String,
    /// Direct audio stream URL, possibly still carrying a query string.
    pub stream_url: String,
    /// Cover art URL.
    pub cover_url: String,
    /// Full lyric text.
    pub lyrics: String,
}

impl MusicCard {
    /// Build a card from a catalog detail record.
    pub fn from_detail(detail: &TrackDetail) -> Self {
        Self {
            title: detail.title.clone(),
            singer: detail.singer.clone(),
            page_url: detail.page_url.clone(),
            stream_url: detail.stream_url.clone(),
            cover_url: detail.cover_url.clone(),
            lyrics: detail.lyrics.clone(),
        }
    }

    /// Render the XML payload for an app message.
    ///
    /// `from_account` is the platform id of the account sending the card.
    pub fn render(&self, variant: CardVariant, from_account: &str) -> String {
        let title = escape(self.title.as_str());
        let singer = escape(self.singer.as_str());
        let page_url = escape(self.page_url.as_str());
        let stream_url = escape(strip_query(&self.stream_url));
        let cover_url = escape(self.cover_url.as_str());
        let lyrics = escape(self.lyrics.as_str());
        let from_account = escape(from_account);

        match variant {
            CardVariant::Standard => format!(
                r#"<appmsg appid="{app_id}" sdkver="0">
    <title>{title}</title>
    <des>{singer}</des>
    <action>view</action>
    <type>3</type>
    <showtype>0</showtype>
    <content/>
    <url>{page_url}</url>
    <dataurl>{stream_url}</dataurl>
    <lowurl>{page_url}</lowurl>
    <lowdataurl>{stream_url}</lowdataurl>
    <recorditem/>
    <thumburl>{cover_url}</thumburl>
    <messageaction/>
    <laninfo/>
    <extinfo/>
    <sourceusername/>
    <sourcedisplayname/>
    <songlyric>{lyrics}</songlyric>
    <commenturl/>
    <appattach>
        <totallen>0</totallen>
        <attachid/>
        <emoticonmd5/>
        <fileext/>
        <aeskey/>
    </appattach>
    <webviewshared>
        <publisherId/>
        <publisherReqId>0</publisherReqId>
    </webviewshared>
    <weappinfo>
        <pagepath/>
        <username/>
        <appid/>
        <appservicetype>0</appservicetype>
    </weappinfo>
    <websearch/>
    <songalbumurl>{cover_url}</songalbumurl>
</appmsg>
<fromusername>{from_account}</fromusername>
<scene>0</scene>
<appinfo>
    <version>1</version>
    <appname/>
</appinfo>
<commenturl/>"#,
                app_id = STANDARD_APP_ID,
            ),
            CardVariant::Shake => format!(
                r#"<appmsg appid="{app_id}" sdkver="0">
    <title>{title}</title>
    <des>{singer}</des>
    <action>view</action>
    <type>3</type>
    <showtype>0</showtype>
    <content/>
    <url>{page_url}</url>
    <dataurl>{stream_url}</dataurl>
    <lowurl>{page_url}</lowurl>
    <lowdataurl>{stream_url}</lowdataurl>
    <thumburl>{cover_url}</thumburl>
    <songlyric>{lyrics}</songlyric>
    <songalbumurl>{cover_url}</songalbumurl>
    <appattach>
        <totallen>0</totallen>
        <attachid/>
        <emoticonmd5/>
        <fileext/>
        <aeskey/>
    </appattach>
    <weappinfo>
        <pagepath/>
        <username/>
        <appid/>
        <appservicetype>0</appservicetype>
    </weappinfo>
</appmsg>
<fromusername>{from_account}</fromusername>
<scene>0</scene>
<appinfo>
    <version>29</version>
    <appname>{app_name}</appname>
</appinfo>
<commenturl/>"#,
                app_id = SHAKE_APP_ID,
                app_name = SHAKE_APP_NAME,
            ),
        }
    }
}

/// Drop the query string from a URL, keeping everything before the first `?`.
fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> MusicCard {
        MusicCard {
            title: "Hotel California".to_string(),
            singer: "Eagles".to_string(),
            page_url: "http://h/page".to_string(),
            stream_url: "http://h/f.mp3?vkey=abc123&guid=xyz".to_string(),
            cover_url: "http://h/cover.jpg".to_string(),
            lyrics: "On a dark desert highway".to_string(),
        }
    }

    #[test]
    fn test_render_strips_stream_query() {
        let xml = sample_card().render(CardVariant::Standard, "bot-1");

        assert!(xml.contains("<dataurl>http://h/f.mp3</dataurl>"));
        assert!(xml.contains("<lowdataurl>http://h/f.mp3</lowdataurl>"));
        assert!(!xml.contains("vkey"));
        // The page URL keeps its full form.
        assert!(xml.contains("<url>http://h/page</url>"));
    }

    #[test]
    fn test_render_escapes_markup() {
        let mut card = sample_card();
        card.title = "Rock & Roll <Live>".to_string();
        card.lyrics = "she said \"hi\"".to_string();
        let xml = card.render(CardVariant::Standard, "bot-1");

        assert!(xml.contains("<title>Rock &amp; Roll &lt;Live&gt;</title>"));
        assert!(xml.contains("<songlyric>she said &quot;hi&quot;</songlyric>"));
        assert!(!xml.contains("<Live>"));
    }

    #[test]
    fn test_standard_variant_identity() {
        let xml = sample_card().render(CardVariant::Standard, "bot-1");

        assert!(xml.starts_with(r#"<appmsg appid="wx79f2c4418704b4f8" sdkver="0">"#));
        assert!(xml.contains("<version>1</version>"));
        assert!(xml.contains("<appname/>"));
        assert!(xml.contains("<websearch/>"));
        assert!(xml.ends_with("<commenturl/>"));
    }

    #[test]
    fn test_shake_variant_identity() {
        let xml = sample_card().render(CardVariant::Shake, "bot-1");

        assert!(xml.starts_with(r#"<appmsg appid="wx485a97c844086dc9" sdkver="0">"#));
        assert!(xml.contains("<version>29</version>"));
        assert!(xml.contains("<appname>摇一摇搜歌</appname>"));
        assert!(!xml.contains("<websearch/>"));
    }

    #[test]
    fn test_render_stamps_sender_account() {
        let xml = sample_card().render(CardVariant::Shake, "bot-wxid-42");
        assert!(xml.contains("<fromusername>bot-wxid-42</fromusername>"));
    }

    #[test]
    fn test_from_detail_copies_fields() {
        let detail = TrackDetail {
            title: "Halcyon".to_string(),
            singer: "OceanLab".to_string(),
            stream_url: "http://h/halcyon.mp3?sig=1".to_string(),
            page_url: "http://h/halcyon".to_string(),
            cover_url: "http://h/halcyon.jpg".to_string(),
            lyrics: String::new(),
        };
        let card = MusicCard::from_detail(&detail);

        assert_eq!(card.title, "Halcyon");
        assert_eq!(card.stream_url, "http://h/halcyon.mp3?sig=1");
        assert_eq!(card.lyrics, "");
    }

    #[test]
    fn test_strip_query_without_query() {
        assert_eq!(strip_query("http://h/f.mp3"), "http://h/f.mp3");
        assert_eq!(strip_query(""), "");
    }
}
