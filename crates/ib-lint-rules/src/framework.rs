//! Outlets UIKit classes declare themselves.
//!
//! A project class inherits these from its framework superclass, so the
//! Swift sources never declare them.

const VIEW_CONTROLLER: &[&str] = &["view", "searchDisplayController"];
const TABLE_VIEW_CONTROLLER: &[&str] = &["view", "searchDisplayController", "tableView"];
const COLLECTION_VIEW_CONTROLLER: &[&str] =
    &["view", "searchDisplayController", "collectionView"];
const DATA_SOURCE: &[&str] = &["dataSource", "delegate", "prefetchDataSource"];
const PICKER: &[&str] = &["dataSource", "delegate"];
const DELEGATE: &[&str] = &["delegate"];
const WEB_VIEW: &[&str] = &["navigationDelegate", "UIDelegate"];
const NONE: &[&str] = &[];

/// Outlets `class` provides, or `None` if `class` is not a known UIKit
/// class.
pub(crate) fn inherited_outlets(class: &str) -> Option<&'static [&'static str]> {
    let outlets = match class {
        "UIViewController"
        | "UINavigationController"
        | "UITabBarController"
        | "UIPageViewController"
        | "UISplitViewController"
        | "UIInputViewController" => VIEW_CONTROLLER,
        "UITableViewController" => TABLE_VIEW_CONTROLLER,
        "UICollectionViewController" => COLLECTION_VIEW_CONTROLLER,
        "UITableView" | "UICollectionView" => DATA_SOURCE,
        "UIPickerView" => PICKER,
        "UIScrollView" | "UITextField" | "UITextView" | "UISearchBar" | "MKMapView"
        | "UIGestureRecognizer" | "UITapGestureRecognizer" | "UIPanGestureRecognizer"
        | "UISwipeGestureRecognizer" | "UILongPressGestureRecognizer" => DELEGATE,
        "WKWebView" => WEB_VIEW,
        "NSObject" | "UIResponder" | "UIView" | "UIControl" | "UIButton" | "UILabel"
        | "UIImageView" | "UIStackView" | "UISwitch" | "UISlider" | "UIStepper"
        | "UISegmentedControl" | "UIPageControl" | "UIProgressView"
        | "UIActivityIndicatorView" | "UIDatePicker" | "UITableViewCell"
        | "UICollectionViewCell" | "UICollectionReusableView"
        | "UITableViewHeaderFooterView" | "UINavigationBar" | "UIToolbar" | "UITabBar"
        | "UIVisualEffectView" => NONE,
        _ => return None,
    };
    Some(outlets)
}
